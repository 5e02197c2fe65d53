use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::reader::Passage;

/// Render the reading pane: a green heading above hadith text, or a green
/// reference below each ayat. Blank lines separate passages.
pub(crate) fn passage_lines(passages: &[Passage]) -> Vec<Line<'static>> {
    let heading_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let caption_style = Style::default().fg(Color::Green);

    let mut lines = Vec::new();
    for (idx, passage) in passages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        if let Some(heading) = &passage.heading {
            lines.push(Line::from(Span::styled(heading.clone(), heading_style)));
            lines.push(Line::from(""));
        }
        for text_line in passage.text.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        if let Some(caption) = &passage.caption {
            lines.push(Line::from(Span::styled(format!("({caption})"), caption_style)));
        }
    }
    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn hadith_passage_puts_heading_first() {
        let passages = vec![Passage {
            heading: Some("Revelation".into()),
            text: "first line\nsecond line".into(),
            caption: None,
        }];
        assert_eq!(
            plain(&passage_lines(&passages)),
            vec!["Revelation", "", "first line", "second line"]
        );
    }

    #[test]
    fn ayat_captions_follow_each_passage() {
        let passages = vec![
            Passage {
                heading: None,
                text: "a".into(),
                caption: Some("Al-Baqara 2:83".into()),
            },
            Passage {
                heading: None,
                text: "b".into(),
                caption: Some("Al-Baqara 2:84".into()),
            },
        ];
        assert_eq!(
            plain(&passage_lines(&passages)),
            vec!["a", "(Al-Baqara 2:83)", "", "b", "(Al-Baqara 2:84)"]
        );
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert!(popup.x >= 20 && popup.y >= 10);
    }
}
