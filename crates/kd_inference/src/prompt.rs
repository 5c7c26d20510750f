use kd_core::Article;

const NEWS_BLOCK: &str = "{news_block}";

pub const DIGEST_PROMPT: &str = r#"
Ты — аналитик ОЮЛ «Казахстанская Электроэнергетическая Ассоциация» (КЭА, Казахстан).

Ниже — список новостей по энергетике РК за последние 7 дней.
Составь еженедельный дайджест СТРОГО в формате JSON, описанном ниже.

ПРАВИЛА:
1. Каждая новость — 2-3 предложения максимум: факт + почему важно для КЭА.
2. Слухи, неподтверждённые данные — исключить.
3. Если новость нерелевантна для энергетики РК — не включать.
4. Разделы: включай только те, по которым есть материал.
5. Блок "requires_action": 2-3 конкретных действия для ассоциации (не общие фразы).
6. Язык — русский, деловой стиль.

ФОРМАТ ОТВЕТА (строго JSON, без markdown-обрамления):
{
  "period": "дд.мм.гггг — дд.мм.гггг",
  "sections": [
    {
      "id": "regulatory",
      "title": "Регуляторика и госполитика",
      "icon": "⚙",
      "items": [
        {
          "label": "Краткий заголовок (до 7 слов)",
          "source": "Название источника, дд.мм.гггг",
          "text": "2-3 предложения с фактом и значимостью для КЭА."
        }
      ]
    },
    {
      "id": "tariffs",
      "title": "Тарифы и рынок",
      "icon": "₸",
      "items": [...]
    },
    {
      "id": "renewables",
      "title": "ВИЭ и новые проекты",
      "icon": "⚡",
      "items": [...]
    },
    {
      "id": "infrastructure",
      "title": "Инфраструктура и надёжность",
      "icon": "🔌",
      "items": [...]
    },
    {
      "id": "international",
      "title": "Международная повестка",
      "icon": "🌐",
      "items": [...]
    },
    {
      "id": "events",
      "title": "Анонсы и мероприятия",
      "icon": "📅",
      "items": [...]
    }
  ],
  "requires_action": [
    {
      "title": "Краткое действие (до 8 слов)",
      "text": "Конкретное описание что и зачем сделать КЭА."
    }
  ]
}

НОВОСТИ ЗА НЕДЕЛЮ:
{news_block}
"#;

/// Numbered listing of the articles, blank line between entries.
pub fn format_news_block(articles: &[Article]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!(
                "{}. [{} | {}] {}\n   {}\n   Ссылка: {}",
                i + 1,
                a.source,
                a.date,
                a.title,
                a.summary,
                a.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(articles: &[Article]) -> String {
    DIGEST_PROMPT.replace(NEWS_BLOCK, &format_news_block(articles))
}

/// Stand-in sent when collection found nothing, so the model still answers.
pub fn placeholder_article(today: &str) -> Article {
    Article {
        source: "Система".to_string(),
        title: "За текущую неделю существенных новостей не обнаружено".to_string(),
        summary: String::new(),
        link: String::new(),
        date: today.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(n: usize) -> Article {
        Article {
            source: "Kapital.kz".to_string(),
            title: format!("Новость {}", n),
            summary: "Кратко".to_string(),
            link: format!("https://kapital.kz/{}", n),
            date: "12.10.2026".to_string(),
        }
    }

    #[test]
    fn test_format_news_block() {
        let block = format_news_block(&[article(1), article(2)]);
        assert_eq!(
            block,
            "1. [Kapital.kz | 12.10.2026] Новость 1\n   Кратко\n   Ссылка: https://kapital.kz/1\n\n\
             2. [Kapital.kz | 12.10.2026] Новость 2\n   Кратко\n   Ссылка: https://kapital.kz/2"
        );
    }

    #[test]
    fn test_build_prompt_fills_placeholder_once() {
        let prompt = build_prompt(&[article(1)]);
        assert!(!prompt.contains(NEWS_BLOCK));
        assert!(prompt.trim_end().ends_with("Ссылка: https://kapital.kz/1"));
        assert!(prompt.contains("\"requires_action\""));
    }
}
