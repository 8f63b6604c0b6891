#![windows_subsystem = "windows"]

mod chart;
mod logger;
mod modal;
mod screen;
mod style;
mod tooltip;

use data::config::api_base_override;
use data::{SAVED_STATE_PATH, UserTimezone};
use iced::widget::{column, container, pick_list, row, scrollable, space, text};
use iced::{Alignment, Element, Size, Task, Theme};
use modal::{Dialog, dialog_modal};
use screen::dashboard::{self, Dashboard};

fn main() -> iced::Result {
    logger::setup(cfg!(debug_assertions)).expect("Failed to initialize logger");

    iced::application(Kandleboard::new, Kandleboard::update, Kandleboard::view)
        .title(Kandleboard::title)
        .theme(Kandleboard::theme)
        .settings(iced::Settings {
            default_text_size: iced::Pixels(12.0),
            antialiasing: true,
            ..Default::default()
        })
        .window_size(Size::new(1280.0, 900.0))
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    Dashboard(dashboard::Message),
    SetTimezone(UserTimezone),
    DismissDialog,
}

struct Kandleboard {
    config: data::State,
    dashboard: Dashboard,
    theme: Theme,
    dialog: Option<Dialog>,
}

impl Kandleboard {
    fn new() -> (Self, Task<Message>) {
        let config = match data::read_from_file(SAVED_STATE_PATH) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default state: {e}");
                data::State::default()
            }
        }
        .with_api_base(api_base_override());

        log::info!("Symbol API at {}", config.api_base);

        (
            Self {
                dashboard: Dashboard::new(&config),
                config,
                theme: style::custom_theme(),
                dialog: None,
            },
            Task::none(),
        )
    }

    fn title(&self) -> String {
        match &self.config.last_lookup {
            Some(request) => format!("KandleBoard - {}", request.symbol),
            None => "KandleBoard".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        self.theme.clone()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Dashboard(message) => {
                let (task, action) = self.dashboard.update(message);

                match action {
                    Some(dashboard::Action::Loaded(request)) => {
                        self.config.last_lookup = Some(request);
                        self.save_state();
                    }
                    Some(dashboard::Action::Failed(dialog)) => {
                        self.dialog = Some(dialog);
                    }
                    None => {}
                }

                return task.map(Message::Dashboard);
            }
            Message::SetTimezone(timezone) => {
                self.config.timezone = timezone;
                self.dashboard.invalidate();
                self.save_state();
            }
            Message::DismissDialog => {
                self.dialog = None;
            }
        }

        Task::none()
    }

    fn save_state(&self) {
        match serde_json::to_string_pretty(&self.config) {
            Ok(json) => {
                if let Err(e) = data::write_json_to_file(&json, SAVED_STATE_PATH) {
                    log::error!("Failed to write state file: {e}");
                } else {
                    log::debug!("State saved to {SAVED_STATE_PATH}");
                }
            }
            Err(e) => log::error!("Failed to serialize state: {e}"),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("KandleBoard").size(20).style(style::branding_text),
            space::horizontal(),
            text("Timezone").style(style::muted_text),
            pick_list(
                &UserTimezone::ALL[..],
                Some(self.config.timezone),
                Message::SetTimezone,
            ),
        ]
        .spacing(8)
        .padding([12, 16])
        .align_y(Alignment::Center);

        let content = column![
            header,
            scrollable(
                self.dashboard
                    .view(self.config.timezone)
                    .map(Message::Dashboard)
            ),
        ];

        let base = container(content).width(iced::Length::Fill);

        match &self.dialog {
            Some(dialog) => dialog_modal(base, dialog, Message::DismissDialog),
            None => base.into(),
        }
    }
}
