//! Reusable UI components.

use iced::widget::{button, container, row, text, Text};
use iced::{Color, Element, Fill};

pub const WARNING_TEXT: Color = Color::from_rgb(1.0, 0.7, 0.3);
pub const MUTED_TEXT: Color = Color::from_rgb(0.6, 0.6, 0.6);

pub fn status_text(label: &str, is_good: bool) -> Text<'_> {
    text(label).size(13).color(if is_good {
        Color::from_rgb(0.4, 1.0, 0.4)
    } else {
        Color::from_rgb(1.0, 0.4, 0.4)
    })
}

pub fn card_container<'a, M: 'a>(
    content: impl Into<Element<'a, M>>,
    bg: Color,
    border: Color,
) -> container::Container<'a, M> {
    container(content)
        .padding(14)
        .width(Fill)
        .style(move |_| container::Style {
            background: Some(iced::Background::Color(bg)),
            border: iced::Border {
                color: border,
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        })
}

fn banner<'a, M: 'a>(
    content: impl Into<Element<'a, M>>,
    bg: Color,
    border: Color,
) -> container::Container<'a, M> {
    container(content)
        .padding(12)
        .width(Fill)
        .style(move |_| container::Style {
            background: Some(iced::Background::Color(bg)),
            border: iced::Border {
                color: border,
                width: 1.0,
                radius: 6.0.into(),
            },
            ..Default::default()
        })
}

pub fn admin_warning<'a, M: Clone + 'a>(on_restart: M) -> container::Container<'a, M> {
    banner(
        row![
            text("Some settings need administrator rights").size(13).width(Fill),
            button("Restart as admin").on_press(on_restart).padding([5, 10]),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
        Color::from_rgb(0.25, 0.2, 0.15),
        Color::from_rgb(0.6, 0.5, 0.3),
    )
}

pub fn status_banner<'a, M: 'a>(message: &'a str, is_error: bool) -> container::Container<'a, M> {
    let (bg, border) = if is_error {
        (Color::from_rgb(0.3, 0.15, 0.15), Color::from_rgb(0.7, 0.35, 0.35))
    } else {
        (Color::from_rgb(0.2, 0.25, 0.15), Color::from_rgb(0.5, 0.6, 0.3))
    };
    banner(text(message).size(14), bg, border)
}
