//! The editorial voice every post is rewritten into.

/// Closing line of the canned post used when the service is unavailable.
pub const CLOSING_LINE: &str = "Это могла бы быть история. Это мог бы быть стиль.";

pub fn rewrite_prompt(text: &str, title: Option<&str>, ceiling: usize, hashtag: &str) -> String {
    let mut prompt = format!(
        "Ты — редактор глянцевого журнала. Перепиши материал ниже в короткий пост для канала.\n\
         Правила:\n\
         - обращайся к читателю на «ты»;\n\
         - тон ироничный, уверенный, чуть дерзкий, без канцелярита;\n\
         - первая фраза цепляет, дальше два-три коротких абзаца и финальная мысль;\n\
         - не больше {ceiling} слов;\n\
         - никаких списков, ссылок, цитат целиком и слов «уникальный», «инновационный»;\n\
         - не выдумывай факты, которых нет в материале;\n\
         - последней строкой поставь хэштег {hashtag}.\n"
    );

    if let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) {
        prompt.push_str(&format!("\nЗаголовок: {title}\n"));
    }
    prompt.push_str("\nМатериал:\n");
    prompt.push_str(text);
    prompt
}

pub fn filler_prompt(topic: &str) -> String {
    format!(
        "Напиши связный текст из трёх-четырёх абзацев на тему «{topic}»: \
         один свежий тренд или наблюдение, конкретные детали, без воды и без заголовка. \
         Пиши по-русски."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_prompt_carries_rules_and_input() {
        let prompt = rewrite_prompt("Текст статьи", Some(" Заголовок "), 140, "#глянец");
        assert!(prompt.contains("не больше 140 слов"));
        assert!(prompt.contains("#глянец"));
        assert!(prompt.contains("Заголовок: Заголовок\n"));
        assert!(prompt.ends_with("Материал:\nТекст статьи"));
    }

    #[test]
    fn blank_title_is_left_out() {
        let prompt = rewrite_prompt("x", Some("  "), 100, "#t");
        assert!(!prompt.contains("Заголовок:"));
    }
}
