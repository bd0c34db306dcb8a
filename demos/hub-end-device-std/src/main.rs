// Runs the end device on the host against the network simulator.
// The tick task stands in for the 10 Hz timer interrupt and the input task
// presses the two buttons alternately, like a user would.

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use env_logger::Builder;
use hub_end_device::{
    Button, ButtonMailbox, DeviceContext, EndDevice, EndDeviceConfiguration, IndicatorPanel, NetworkSimulator, NetworkStatus,
    TICKS_PER_SECOND, TickCounter, tick_task,
};
use log::{LevelFilter, log};

static CONTEXT: DeviceContext = DeviceContext::new(TICKS_PER_SECOND);

type HostDevice = EndDevice<'static, NetworkSimulator, TickCounter, IndicatorPanel>;

#[embassy_executor::task]
async fn input_task(buttons: &'static ButtonMailbox) -> ! {
    let mut next = Button::A;
    loop {
        Timer::after(Duration::from_secs(3)).await;
        log!(log::Level::Info, "Pressing button {:?}", next);
        buttons.press(next);
        next = match next {
            Button::A => Button::B,
            Button::B => Button::A,
        };
    }
}

#[embassy_executor::task]
async fn device_task(device: HostDevice) -> ! {
    device.run().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    Builder::new().filter_level(LevelFilter::Debug).init();

    log!(log::Level::Info, "Starting up");
    spawner.must_spawn(tick_task(&CONTEXT.ticks));

    // an access point that shows up late and a lossy channel
    let mut network = NetworkSimulator::new(0x5eed).with_ack_loss(40);
    network.script_init(NetworkStatus::NoJoin, 3).script_link(NetworkStatus::NoLink, 2);

    let device = EndDevice::with_context(network, IndicatorPanel::new(), &CONTEXT, EndDeviceConfiguration::new());
    spawner.must_spawn(device_task(device));
    spawner.must_spawn(input_task(&CONTEXT.buttons));
}
