#![no_std]
#![no_main]

use embedded_can::{Frame, Id};
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    entry,
    gpio::{Input, Level, Output, Pull},
    twai::{self, Twai, TwaiMode},
};
use log::info;

use bedctl_common::{CanFrame, Controller, Hal};

// Pin assignment. The TX pin is required by the TWAI controller even
// in listen-only mode; it connects to the transceiver, not the bus.
// GPIO5  - cargo light relay
// GPIO4  - latch release relay
// GPIO16 - parked LED
// GPIO15 - unlocked LED
// GPIO17 - latch button, pull-up, active low
// GPIO7/6 - TWAI TX/RX to the onboard transceiver

const HEARTBEAT_INTERVAL_MS: u32 = 10_000;

struct BoardHal<'d> {
    twai: Twai<'d, esp_hal::Blocking>,
    button: Input<'d>,
    light: Output<'d>,
    latch: Output<'d>,
    parked_led: Output<'d>,
    unlocked_led: Output<'d>,
}

impl Hal for BoardHal<'_> {
    fn receive_frame(&mut self, frame: &mut CanFrame) -> bool {
        match self.twai.receive() {
            Ok(rx) => {
                frame.id = match rx.id() {
                    Id::Standard(id) => u32::from(id.as_raw()),
                    Id::Extended(id) => id.as_raw(),
                };
                frame.len = rx.dlc() as u8;
                frame.data = [0; 8];
                frame.data[..rx.data().len()].copy_from_slice(rx.data());
                frame.timestamp_ms = now_ms();
                true
            }
            Err(_) => false,
        }
    }

    fn read_button(&mut self) -> bool {
        // Active low with pull-up.
        self.button.is_low()
    }

    fn set_light(&mut self, on: bool) {
        self.light.set_level(if on { Level::High } else { Level::Low });
    }

    fn set_latch(&mut self, on: bool) {
        self.latch.set_level(if on { Level::High } else { Level::Low });
    }

    fn set_parked_led(&mut self, on: bool) {
        self.parked_led.set_level(if on { Level::High } else { Level::Low });
    }

    fn set_unlocked_led(&mut self, on: bool) {
        self.unlocked_led.set_level(if on { Level::High } else { Level::Low });
    }

    fn now_ms(&self) -> u32 {
        now_ms()
    }
}

fn now_ms() -> u32 {
    esp_hal::time::now().duration_since_epoch().to_millis() as u32
}

#[entry]
fn main() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    esp_println::logger::init_logger_from_env();

    info!("bedctl starting");

    // 500 kbit/s listen-only; the controller never transmits.
    let twai_config = twai::TwaiConfiguration::new(
        peripherals.TWAI0,
        peripherals.GPIO6,
        peripherals.GPIO7,
        twai::BaudRate::B500K,
        TwaiMode::ListenOnly,
    );
    let twai = twai_config.start();

    let mut hal = BoardHal {
        twai,
        button: Input::new(peripherals.GPIO17, Pull::Up),
        light: Output::new(peripherals.GPIO5, Level::Low),
        latch: Output::new(peripherals.GPIO4, Level::Low),
        parked_led: Output::new(peripherals.GPIO16, Level::Low),
        unlocked_led: Output::new(peripherals.GPIO15, Level::Low),
    };

    let mut controller = Controller::new();
    let delay = Delay::new();
    let mut last_heartbeat = now_ms();

    info!("bedctl ready, entering control loop");

    loop {
        controller.poll(&mut hal);

        let now = now_ms();
        if now.wrapping_sub(last_heartbeat) >= HEARTBEAT_INTERVAL_MS {
            last_heartbeat = now;
            info!(
                "heartbeat: ready={} parked={} unlocked={} presses={}",
                controller.vehicle().system_ready(),
                controller.vehicle().parked(),
                controller.vehicle().unlocked(),
                controller.button().press_count(),
            );
        }

        delay.delay_millis(1);
    }
}
