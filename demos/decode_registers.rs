use can_bit_timing::bittiming::BitTimingBuilder;
use can_bit_timing::controller::{self, Phase};
use tracing_subscriber;

fn main() {
    tracing_subscriber::fmt::init();

    let mcan = controller::find("mcan-v3.1+").unwrap();
    let btc = mcan.at_clock(Phase::Nominal, 40_000_000).unwrap();

    let solution = BitTimingBuilder::new(btc)
        .brp(1)
        .tseg1(32)
        .tseg2(8)
        .build()
        .unwrap();

    println!("{:?}", solution.timing);
    if let Some(encoder) = mcan.encoder {
        println!("{}: {}", encoder.header().trim(), encoder.encode(&solution.timing));
    }
}
