use clap::Parser;
use config::Args;
use gcscore::config::GcsConfig;
use gcscore::link::{MavlinkLink, VehicleLink};
use gcscore::render::{OverlayLabel, RadarView};
use gcscore::{DataLoop, DataViewState, VideoLoop, VideoViewState};
use iced::{
    time,
    widget::{button, column, image, progress_bar, row, stack, text, Canvas, Column, Container},
    window, Alignment, Color, ContentFit, Element, Length, Subscription, Task, Theme,
};
use log::info;
use overlay::LabelLayer;
use radar::RadarCanvas;
use std::time::Duration;

mod config;
mod overlay;
mod radar;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let station_config = config::resolve(&args)?;

    iced::application(
        move || GroundStation::boot(&station_config),
        GroundStation::update,
        GroundStation::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .window_size((1280.0, 850.0))
    .exit_on_close_request(false)
    .run()
    .map_err(|err| anyhow::anyhow!("console window failed: {err}"))
}

fn application_title(_: &GroundStation) -> String {
    "VTOL Ground Control Console".into()
}

fn application_subscription(state: &GroundStation) -> Subscription<Message> {
    let close = window::close_requests().map(Message::CloseRequested);
    if !state.running {
        return close;
    }
    Subscription::batch([
        time::every(state.video_interval).map(|_| Message::VideoTick),
        time::every(state.data_interval).map(|_| Message::DataTick),
        close,
    ])
}

fn application_theme(_: &GroundStation) -> Theme {
    Theme::Dark
}

#[derive(Debug, Clone)]
pub enum Message {
    VideoTick,
    DataTick,
    Command(Command),
    CloseRequested(window::Id),
}

/// Operator buttons. None of them reach the vehicle yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Arm,
    Takeoff,
    ModeVtol,
    ModePlane,
    Lock,
}

impl Command {
    const PANEL: [Command; 5] = [
        Command::Connect,
        Command::Arm,
        Command::Takeoff,
        Command::ModeVtol,
        Command::ModePlane,
    ];

    fn label(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Arm => "ARM",
            Command::Takeoff => "TAKEOFF",
            Command::ModeVtol => "MODE: VTOL",
            Command::ModePlane => "MODE: PLANE",
            Command::Lock => "LOCK",
        }
    }
}

/// Last frame pushed to the camera panel.
struct VideoPanel {
    handle: image::Handle,
    labels: Vec<OverlayLabel>,
    width: u32,
    height: u32,
}

impl From<VideoViewState> for VideoPanel {
    fn from(view: VideoViewState) -> Self {
        let frame = view.frame;
        Self {
            handle: image::Handle::from_rgba(frame.width, frame.height, frame.rgba),
            labels: frame.labels,
            width: frame.width,
            height: frame.height,
        }
    }
}

struct GroundStation {
    video_loop: VideoLoop,
    data_loop: DataLoop,
    radar: RadarView,
    panel: Option<VideoPanel>,
    data: DataViewState,
    link_status: String,
    video_interval: Duration,
    data_interval: Duration,
    running: bool,
}

impl GroundStation {
    fn boot(config: &GcsConfig) -> (Self, Task<Message>) {
        let endpoint = config.link.endpoint.clone();
        let data_loop = DataLoop::connect(
            move || MavlinkLink::connect(&endpoint).map(|link| Box::new(link) as Box<dyn VehicleLink>),
            config,
        );
        let link_status = if data_loop.is_connected() {
            format!("LINK: {}", config.link.endpoint)
        } else {
            "LINK: DEMO DATA".to_string()
        };
        info!("{}", link_status);

        (
            GroundStation {
                video_loop: VideoLoop::from_config(config),
                data: data_loop.initial(),
                data_loop,
                radar: RadarView::from_config(&config.radar),
                panel: None,
                link_status,
                video_interval: Duration::from_millis(config.video.interval_ms.max(1)),
                data_interval: Duration::from_millis(config.telemetry.interval_ms.max(1)),
                running: true,
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::VideoTick => {
                if let Some(view) = state.video_loop.tick() {
                    state.panel = Some(VideoPanel::from(view));
                }
                Task::none()
            }
            Message::DataTick => {
                state.data = state.data_loop.tick();
                Task::none()
            }
            Message::Command(command) => {
                info!("{} pressed; no command uplink is wired", command.label());
                Task::none()
            }
            Message::CloseRequested(_) => {
                state.shutdown();
                iced::exit()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let gauges = [&state.data.altitude, &state.data.speed, &state.data.battery]
            .into_iter()
            .fold(Column::new().spacing(6), |col, reading| {
                col.push(text(reading.title).size(12))
                    .push(progress_bar(0.0..=reading.max, reading.value))
                    .push(text(reading.text()).size(11))
            });

        let telemetry_column = column![
            text("SYSTEM STATUS").size(16),
            gauges,
            text(format!("MODE: {}", state.data.mode_label))
                .size(16)
                .color(Color::from_rgb(1.0, 1.0, 0.0)),
            text(&state.link_status).size(12),
        ]
        .spacing(14)
        .padding(12)
        .width(Length::Fixed(220.0));

        let radar = Canvas::new(RadarCanvas {
            view: &state.radar,
            heading: state.data.heading,
        })
        .width(Length::Fill)
        .height(Length::Fixed(200.0));

        let camera: Element<'_, Message> = match &state.panel {
            Some(panel) => stack![
                image(panel.handle.clone())
                    .content_fit(ContentFit::Fill)
                    .width(Length::Fill)
                    .height(Length::Fill),
                Canvas::new(LabelLayer {
                    labels: &panel.labels,
                    frame_width: panel.width,
                    frame_height: panel.height,
                })
                .width(Length::Fill)
                .height(Length::Fill),
            ]
            .into(),
            None => Container::new(text("NO CAMERA SIGNAL").size(20))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let metrics = state
            .video_loop
            .metrics()
            .merged(&state.data_loop.metrics());

        let center_column = column![
            radar,
            Container::new(camera)
                .width(Length::Fill)
                .height(Length::Fill),
            text(metrics.summary()).size(11),
        ]
        .spacing(8)
        .width(Length::Fill);

        let commands = Command::PANEL
            .iter()
            .fold(Column::new().spacing(8), |col, command| {
                col.push(
                    button(text(command.label()))
                        .on_press(Message::Command(*command))
                        .width(Length::Fill)
                        .padding(6),
                )
            });

        let command_column = column![
            text("COMMANDS").size(16),
            commands,
            Container::new(text("")).height(Length::Fill),
            button(text(Command::Lock.label()))
                .on_press(Message::Command(Command::Lock))
                .style(button::danger)
                .width(Length::Fill)
                .height(Length::Fixed(50.0)),
        ]
        .spacing(12)
        .padding(12)
        .width(Length::Fixed(160.0));

        let layout = row![telemetry_column, center_column, command_column]
            .spacing(12)
            .align_y(Alignment::Start)
            .padding(12);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Stops both timers and releases the camera and the vehicle link.
    fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.video_loop.release();
        self.data_loop.close();
        info!("console shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcscore::config::VideoSourceKind;

    fn offline_config() -> GcsConfig {
        let mut config = GcsConfig::default();
        config.link.enabled = false;
        config.video.source = VideoSourceKind::None;
        config.telemetry.seed = Some(3);
        config.radar.seed = Some(3);
        config
    }

    #[test]
    fn placeholder_survives_video_ticks() {
        let (mut station, _) = GroundStation::boot(&offline_config());
        for _ in 0..50 {
            let _ = GroundStation::update(&mut station, Message::VideoTick);
        }
        assert!(station.panel.is_none());
    }

    #[test]
    fn data_ticks_drive_heading_and_demo_mode() {
        let (mut station, _) = GroundStation::boot(&offline_config());
        assert_eq!(station.link_status, "LINK: DEMO DATA");
        for _ in 0..3 {
            let _ = GroundStation::update(&mut station, Message::DataTick);
        }
        assert_eq!(station.data.heading.degrees(), 6.0);
        assert_eq!(station.data.mode_label, "AUTO SEARCH");
    }

    #[test]
    fn close_request_releases_once_and_stops_timers() {
        let (mut station, _) = GroundStation::boot(&offline_config());
        let _ = GroundStation::update(&mut station, Message::CloseRequested(window::Id::unique()));
        assert!(!station.running);
        assert!(station.video_loop.is_released());
        station.shutdown();
        assert!(!station.running);
    }

    #[test]
    fn command_labels_are_distinct() {
        let mut labels: Vec<_> = Command::PANEL.iter().map(Command::label).collect();
        labels.push(Command::Lock.label());
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 6);
    }
}
