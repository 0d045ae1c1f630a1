use crate::ui::{components, setting_view};
use ad_disabler::{restart_as_admin, SettingStatus, SystemRegistry, Toggler};
use iced::widget::{button, column, container, row, scrollable, space, text};
use iced::{Element, Fill, Task};
use std::collections::HashSet;
use std::sync::Arc;

type SharedToggler = Arc<Toggler<SystemRegistry>>;

#[derive(Debug, Clone)]
pub enum Message {
    Refresh,
    Loaded(Result<Vec<SettingStatus>, String>),
    Toggle(String, bool),
    Applied(ApplyOutcome),
    RestartAsAdmin,
}

#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    id: String,
    result: Result<(), String>,
    /// Fresh reconciliation of the setting, whatever `result` was.
    status: Option<SettingStatus>,
}

pub struct State {
    toggler: SharedToggler,
    settings: Option<Vec<SettingStatus>>,
    applying: HashSet<String>,
    status_message: String,
    status_is_error: bool,
}

impl State {
    pub fn new(toggler: SharedToggler) -> Self {
        Self {
            toggler,
            settings: None,
            applying: HashSet::new(),
            status_message: String::new(),
            status_is_error: false,
        }
    }

    fn report(&mut self, message: impl Into<String>, is_error: bool) {
        self.status_message = message.into();
        self.status_is_error = is_error;
    }
}

pub fn init(toggler: SharedToggler) -> (State, Task<Message>) {
    let load = Task::perform(load_async(Arc::clone(&toggler)), Message::Loaded);
    (State::new(toggler), load)
}

pub fn update(state: &mut State, message: Message) -> Task<Message> {
    match message {
        Message::Refresh => Task::perform(load_async(Arc::clone(&state.toggler)), Message::Loaded),
        Message::Loaded(result) => {
            match result {
                Ok(settings) => {
                    let failed = settings.iter().filter(|s| s.error.is_some()).count();
                    if failed > 0 {
                        state.report(format!("{failed} setting(s) could not be read"), true);
                    } else {
                        state.status_message.clear();
                    }
                    state.settings = Some(settings);
                }
                Err(e) => state.report(format!("Failed to read settings: {e}"), true),
            }
            Task::none()
        }
        Message::Toggle(id, enable) => {
            // One apply per setting at a time; the row stays inert meanwhile.
            if !state.applying.insert(id.clone()) {
                return Task::none();
            }
            Task::perform(
                apply_async(Arc::clone(&state.toggler), id, enable),
                Message::Applied,
            )
        }
        Message::Applied(outcome) => {
            state.applying.remove(&outcome.id);

            match &outcome.result {
                Ok(()) => state.report("Setting applied", false),
                Err(e) => state.report(e.clone(), true),
            }

            let Some(fresh) = outcome.status else {
                return Task::perform(load_async(Arc::clone(&state.toggler)), Message::Loaded);
            };
            if let Some(slot) = state
                .settings
                .as_mut()
                .and_then(|settings| settings.iter_mut().find(|s| s.id == fresh.id))
            {
                *slot = fresh;
            }
            Task::none()
        }
        Message::RestartAsAdmin => {
            if let Err(e) = restart_as_admin() {
                state.report(e.to_user_string(), true);
            }
            Task::none()
        }
    }
}

pub fn view(state: &State) -> Element<'_, Message> {
    let mut content = column![view_header()].spacing(10).padding(15);

    if !state.toggler.is_elevated() {
        content = content.push(components::admin_warning(Message::RestartAsAdmin));
    }

    if !state.status_message.is_empty() {
        content = content.push(components::status_banner(
            &state.status_message,
            state.status_is_error,
        ));
    }

    content = content.push(space().height(5));

    match &state.settings {
        None => {
            content = content.push(
                container(text("Reading registry...").size(16))
                    .padding(20)
                    .width(Fill),
            );
        }
        Some(settings) => {
            for status in settings {
                let id = status.id.clone();
                content = content.push(setting_view::view(
                    status,
                    state.applying.contains(&status.id),
                    move |enable| Message::Toggle(id.clone(), enable),
                ));
            }
        }
    }

    container(scrollable(content))
        .width(Fill)
        .height(Fill)
        .into()
}

fn view_header() -> Element<'static, Message> {
    row![
        column![
            text("Ad Disabler")
                .size(26)
                .color(iced::Color::from_rgb(0.9, 0.9, 1.0)),
            text("Checked means the ad or nag feature is turned off")
                .size(13)
                .color(components::MUTED_TEXT),
        ]
        .spacing(4),
        space().width(Fill),
        button("Refresh").on_press(Message::Refresh).padding([8, 16]),
    ]
    .spacing(10)
    .padding(5)
    .align_y(iced::Alignment::Center)
    .into()
}

async fn load_async(toggler: SharedToggler) -> Result<Vec<SettingStatus>, String> {
    tokio::task::spawn_blocking(move || toggler.get_all_setting_states())
        .await
        .map_err(|e| e.to_string())
}

async fn apply_async(toggler: SharedToggler, id: String, enable: bool) -> ApplyOutcome {
    let task_id = id.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let result = toggler
            .on_toggle(&task_id, enable)
            .map_err(|e| e.to_user_string());
        let status = toggler.setting_status(&task_id).ok();
        (result, status)
    })
    .await;

    match joined {
        Ok((result, status)) => ApplyOutcome { id, result, status },
        Err(e) => ApplyOutcome {
            id,
            result: Err(e.to_string()),
            status: None,
        },
    }
}
