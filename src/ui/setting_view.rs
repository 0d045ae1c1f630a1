//! One row per catalog setting.

use crate::ui::components;
use ad_disabler::{SettingStatus, ToggleState};
use iced::widget::{column, row, text, toggler};
use iced::{Color, Element, Fill};

pub fn view<'a, M: Clone + 'a>(
    status: &'a SettingStatus,
    applying: bool,
    on_toggle: impl Fn(bool) -> M + 'a,
) -> Element<'a, M> {
    let mut switch = toggler(status.state.is_checked())
        .label(status.label.as_str())
        .size(20)
        .width(Fill);
    if status.state.is_interactive() && !applying {
        switch = switch.on_toggle(on_toggle);
    }

    let (state_label, is_good) = match (status.state, applying) {
        (_, true) => ("APPLYING", true),
        (ToggleState::On, _) => ("OFF IN WINDOWS", true),
        (ToggleState::Off, _) => ("ACTIVE", false),
        (ToggleState::Disabled, _) => ("UNAVAILABLE", false),
    };

    let mut details = row![components::status_text(state_label, is_good)].spacing(12);
    if status.requires_admin {
        details = details.push(text("admin").size(12).color(components::MUTED_TEXT));
    }
    if status.state.is_interactive() && !status.configured {
        details = details.push(text("not set yet").size(12).color(components::MUTED_TEXT));
    }

    let mut content = column![switch, details].spacing(6);

    if let Some(error) = &status.error {
        content = content.push(
            text(error.to_user_string())
                .size(12)
                .color(components::WARNING_TEXT),
        );
    }

    components::card_container(
        content,
        Color::from_rgb(0.15, 0.2, 0.25),
        Color::from_rgb(0.3, 0.4, 0.5),
    )
    .into()
}
