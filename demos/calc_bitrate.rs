use can_bit_timing::bittiming::{calc_bittiming, Algorithm, BitTimingRequest};
use can_bit_timing::controller::{self, Phase};
use tracing_subscriber;

fn main() {
    tracing_subscriber::fmt::init();

    let bitrate = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(500_000);

    for controller in controller::all() {
        for clock in controller.ref_clocks {
            let btc = controller.at_clock(Phase::Nominal, clock.clk).unwrap();
            match calc_bittiming(&btc, &BitTimingRequest::new(bitrate), Algorithm::default()) {
                Ok(solution) => {
                    let registers = controller.encoder.map(|e| e.encode(&solution.timing));
                    println!("{} @ {}: {:?} {:?}", controller.name, clock, solution, registers);
                }
                Err(e) => println!("{} @ {}: {}", controller.name, clock, e),
            }
        }
    }
}
