use evdev::{AbsoluteAxisType, Device, InputEventKind};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum StylusEvent {
    Absolute { axis: AbsoluteAxisType, value: i32 },
    Pressure { value: i32 },
    Key { key: evdev::Key, value: i32 },
}

/// Read a stylus/tablet evdev device on its own thread and forward events
/// over the channel. Exits when the receiver is dropped.
pub fn read_input(device_path: String, sender: Sender<StylusEvent>) {
    thread::spawn(move || {
        let mut device = match Device::open(&device_path) {
            Ok(device) => device,
            Err(err) => {
                warn!(%err, %device_path, "could not open stylus device");
                return;
            }
        };

        loop {
            match device.fetch_events() {
                Ok(events) => {
                    for event in events {
                        let stylus_event = match event.kind() {
                            InputEventKind::AbsAxis(axis) => match axis {
                                AbsoluteAxisType::ABS_X | AbsoluteAxisType::ABS_Y => {
                                    StylusEvent::Absolute {
                                        axis,
                                        value: event.value(),
                                    }
                                }
                                AbsoluteAxisType::ABS_PRESSURE => StylusEvent::Pressure {
                                    value: event.value(),
                                },
                                _ => continue,
                            },
                            InputEventKind::Key(key) => StylusEvent::Key {
                                key,
                                value: event.value(),
                            },
                            InputEventKind::Synchronization(_) => continue,
                            other => {
                                debug!(?other, "ignoring stylus event");
                                continue;
                            }
                        };
                        if sender.send(stylus_event).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    warn!(%err, "error fetching stylus events");
                    thread::sleep(Duration::from_secs(1));
                }
            }
        }
    });
}
