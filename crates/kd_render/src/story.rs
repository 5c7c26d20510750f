use kd_core::config::Branding;
use kd_core::DigestDocument;

use crate::blocks::Block;

pub const DEFAULT_PERIOD: &str = "текущая неделя";

/// Something the paginator can place.
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Block(Block),
    /// Vertical gap in millimetres. Dropped at the top of a page.
    Spacer(f32),
    /// Children that must land on the same page.
    KeepTogether(Vec<Flowable>),
}

/// Build the content flow for a digest, in reading order.
pub fn build_story(digest: &DigestDocument, branding: &Branding, today: &str) -> Vec<Flowable> {
    let period = digest.period().unwrap_or(DEFAULT_PERIOD);
    let mut story = vec![
        Flowable::Block(Block::Title {
            heading: "ЕЖЕНЕДЕЛЬНЫЙ ДАЙДЖЕСТ ЭНЕРГЕТИКИ".to_string(),
            period: format!("Период: {}", period),
            caption: format!(
                "Подготовлен: {}  |  Источники: {}",
                today, branding.caption_sources
            ),
        }),
        Flowable::Spacer(6.0),
    ];

    for section in digest.populated_sections() {
        let mut rows = section.items().iter().map(|item| {
            Flowable::Block(Block::NewsRow {
                label: item.label().to_string(),
                source: item.source().to_string(),
                body: item.text().to_string(),
            })
        });

        let mut head = vec![
            Flowable::Block(Block::SectionHeader {
                text: format!("{}  {}", section.icon(), section.title()),
            }),
            Flowable::Spacer(2.0),
        ];
        head.extend(rows.next());
        story.push(Flowable::KeepTogether(head));
        story.extend(rows);
        story.push(Flowable::Spacer(5.0));
    }

    let actions = digest.actions();
    if !actions.is_empty() {
        story.push(Flowable::Block(Block::ActionBanner {
            text: format!("⚠  ТРЕБУЕТ РЕАКЦИИ / ПОЗИЦИИ {}", branding.tag),
        }));
        story.push(Flowable::Spacer(2.0));
        story.extend(actions.iter().enumerate().map(|(i, action)| {
            Flowable::Block(Block::ActionRow {
                number: i + 1,
                title: action.title().to_string(),
                body: action.text().to_string(),
                last: i + 1 == actions.len(),
            })
        }));
        story.push(Flowable::Spacer(5.0));
    }

    story.push(Flowable::Block(Block::Disclaimer {
        text: format!(
            "Дайджест подготовлен автоматически на основе открытых источников. \
             Неподтверждённая информация не включается. {}",
            branding.site
        ),
    }));
    story
}
