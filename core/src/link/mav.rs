use crate::diagnostics::LogManager;
use crate::link::{LinkMessage, VehicleLink};
use crate::prelude::{GcsError, GcsResult};
use mavlink::common::{MavMessage, MavModeFlag, MavType};
use mavlink::error::MessageReadError;
use mavlink::MavConnection;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

type Connection = Box<dyn MavConnection<MavMessage> + Sync + Send>;

/// MAVLink (common dialect) link. A reader thread owns the blocking socket
/// and forwards translated messages over an unbounded channel.
pub struct MavlinkLink {
    inbox: mpsc::UnboundedReceiver<LinkMessage>,
    stop: Arc<AtomicBool>,
    closed: bool,
    logger: LogManager,
}

impl MavlinkLink {
    pub fn connect(endpoint: &str) -> GcsResult<Self> {
        let logger = LogManager::new("link");
        let connection: Connection = mavlink::connect::<MavMessage>(endpoint)
            .map_err(|err| GcsError::ConnectionFailure(format!("{}: {}", endpoint, err)))?;

        let (outbox, inbox) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let reader_stop = stop.clone();
        thread::Builder::new()
            .name("mavlink-reader".into())
            .spawn(move || read_loop(connection, outbox, reader_stop))
            .map_err(|err| GcsError::ConnectionFailure(format!("reader thread: {}", err)))?;

        logger.record(&format!("listening on {}", endpoint));
        Ok(Self {
            inbox,
            stop,
            closed: false,
            logger,
        })
    }
}

impl VehicleLink for MavlinkLink {
    fn try_recv(&mut self) -> Option<LinkMessage> {
        if self.closed {
            return None;
        }
        self.inbox.try_recv().ok()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.stop.store(true, Ordering::Relaxed);
        self.inbox.close();
        self.logger.record("link closed");
    }
}

impl Drop for MavlinkLink {
    fn drop(&mut self) {
        self.close();
    }
}

// Exits on the first wake-up after `stop` is set or the receiver goes away.
fn read_loop(
    connection: Connection,
    outbox: mpsc::UnboundedSender<LinkMessage>,
    stop: Arc<AtomicBool>,
) {
    let logger = LogManager::new("link");
    while !stop.load(Ordering::Relaxed) {
        match connection.recv() {
            Ok((_header, message)) => {
                if let Some(translated) = translate(&message) {
                    if outbox.send(translated).is_err() {
                        break;
                    }
                }
            }
            Err(MessageReadError::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue
            }
            Err(MessageReadError::Io(err)) => {
                logger.warn(&format!("reader stopped: {}", err));
                break;
            }
            Err(err) => logger.trace(&format!("dropping frame: {}", err)),
        }
    }
}

/// Maps the messages the console cares about; everything else is ignored.
pub fn translate(message: &MavMessage) -> Option<LinkMessage> {
    match message {
        MavMessage::VFR_HUD(hud) => Some(LinkMessage::Hud {
            altitude_m: hud.alt,
            groundspeed_mps: hud.groundspeed,
            heading_deg: hud.heading as f32,
        }),
        MavMessage::SYS_STATUS(status) => Some(LinkMessage::Battery {
            remaining_percent: (status.battery_remaining >= 0)
                .then_some(status.battery_remaining as f32),
        }),
        MavMessage::HEARTBEAT(heartbeat) if heartbeat.mavtype != MavType::MAV_TYPE_GCS => {
            Some(LinkMessage::Heartbeat {
                armed: heartbeat
                    .base_mode
                    .contains(MavModeFlag::MAV_MODE_FLAG_SAFETY_ARMED),
            })
        }
        _ => None,
    }
}
