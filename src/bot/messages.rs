//! Fixed replies the bot posts itself.

pub const PROCESSING_URL: &str = "🔍 Обрабатываю ссылку...";
pub const PROCESSING_TEXT: &str = "✍️ Переписываю текст...";
pub const PROCESSING_FILLER: &str = "🎲 Придумываю пост...";

pub const PONG: &str = "🏓 pong";

pub const HELP: &str = "📎 Кинь ссылку на статью, и я сделаю тебе пост.\n\
    !style <текст> — перепишу твой текст\n\
    !filler — придумаю пост сам\n\
    !ping — проверка связи";

pub const FILLER_FAILED: &str = "⚠️ Не удалось сгенерировать пост";
pub const DELIVERY_FAILED: &str = "⚠️ Не удалось отправить пост";

/// Added to a post whose hero image could not be attached.
pub const IMAGE_MISSING: &str = "(Не удалось прикрепить изображение)";
