use crate::bittiming::BitTimingLimits;
use crate::controller::{Controller, RefClock};
use crate::encoder::Encoder;

const fn limits(
    tseg1: (u32, u32),
    tseg2: (u32, u32),
    sjw_max: u32,
    brp: (u32, u32),
) -> BitTimingLimits {
    BitTimingLimits {
        tseg1_min: tseg1.0,
        tseg1_max: tseg1.1,
        tseg2_min: tseg2.0,
        tseg2_max: tseg2.1,
        sjw_max,
        brp_min: brp.0,
        brp_max: brp.1,
        brp_inc: 1,
    }
}

const fn clk(clk: u32) -> RefClock {
    RefClock { clk, name: None }
}

const fn named(clk: u32, name: &'static str) -> RefClock {
    RefClock {
        clk,
        name: Some(name),
    }
}

const CIA_FD_CLOCKS: &[RefClock] = &[
    named(20_000_000, "CIA recommendation"),
    named(40_000_000, "CIA recommendation"),
];

// the classic 16/8/4 layout shared by many SJA1000 style cores
const CLASSIC_64: BitTimingLimits = limits((1, 16), (1, 8), 4, (1, 64));
const CLASSIC_256: BitTimingLimits = limits((1, 16), (1, 8), 4, (1, 256));
const CLASSIC_1024: BitTimingLimits = limits((1, 16), (1, 8), 4, (1, 1024));

const PUCAN_NOMINAL: BitTimingLimits = limits((1, 1 << 8), (1, 1 << 7), 1 << 7, (1, 1 << 10));
const PUCAN_DATA: BitTimingLimits = limits((1, 1 << 5), (1, 1 << 4), 1 << 4, (1, 1 << 10));

const fn controller(
    name: &'static str,
    bittiming_const: BitTimingLimits,
    ref_clocks: &'static [RefClock],
) -> Controller {
    Controller {
        name,
        bittiming_const,
        data_bittiming_const: None,
        ref_clocks,
        encoder: None,
    }
}

pub(crate) static CONTROLLERS: &[Controller] = &[
    Controller {
        encoder: Some(Encoder::RcarCan),
        ..controller(
            "rcar_can",
            limits((4, 16), (2, 8), 4, (1, 1024)),
            &[clk(65_000_000)],
        )
    },
    Controller {
        data_bittiming_const: Some(limits((2, 16), (2, 8), 8, (1, 256))),
        ..controller(
            "rcar_canfd",
            limits((2, 128), (2, 32), 32, (1, 1024)),
            CIA_FD_CLOCKS,
        )
    },
    controller("rcar_canfd (CC)", limits((4, 16), (2, 8), 4, (1, 1024)), &[]),
    // SPI
    controller(
        "hi311x",
        limits((2, 16), (2, 8), 4, (1, 64)),
        &[clk(24_000_000)],
    ),
    Controller {
        encoder: Some(Encoder::Mcp251x),
        // the mcp251x runs from half of the external oscillator
        ..controller(
            "mcp251x",
            limits((3, 16), (2, 8), 4, (1, 64)),
            &[
                named(8_000_000 / 2, "8 MHz OSC"),
                named(12_000_000 / 2, "12 MHz OSC"),
                named(16_000_000 / 2, "16 MHz OSC"),
                named(20_000_000 / 2, "20 MHz OSC"),
            ],
        )
    },
    Controller {
        data_bittiming_const: Some(limits((1, 32), (1, 16), 16, (1, 256))),
        encoder: Some(Encoder::Mcp251xfd),
        ..controller(
            "mcp251xfd",
            limits((2, 256), (1, 128), 128, (1, 256)),
            CIA_FD_CLOCKS,
        )
    },
    // USB
    controller("usb_8dev", CLASSIC_1024, &[clk(32_000_000)]),
    controller("ems_usb", CLASSIC_64, &[clk(8_000_000)]),
    controller(
        "esd_usb2",
        CLASSIC_1024,
        &[
            named(60_000_000, "CAN-USB/2"),
            named(36_000_000, "CAN-USB/Micro"),
        ],
    ),
    Controller {
        encoder: Some(Encoder::Bxcan),
        ..controller("bxcan", CLASSIC_1024, &[clk(48_000_000)])
    },
    Controller {
        data_bittiming_const: Some(CLASSIC_1024),
        ..controller(
            "CANtact Pro",
            CLASSIC_1024,
            &[
                named(24_000_000, "CANtact Pro (original)"),
                named(40_000_000, "CIA recommendation"),
            ],
        )
    },
    controller("kvaser_usb", CLASSIC_64, &[clk(8_000_000)]),
    Controller {
        data_bittiming_const: Some(limits((1, 255), (1, 32), 16, (1, 8192))),
        ..controller(
            "kvaser_usb_kcan",
            limits((1, 255), (1, 32), 16, (1, 8192)),
            &[clk(80_000_000)],
        )
    },
    controller(
        "kvaser_usb_flex",
        limits((4, 16), (2, 8), 4, (1, 256)),
        &[clk(24_000_000)],
    ),
    controller("pcan_usb_pro", CLASSIC_1024, &[clk(56_000_000)]),
    Controller {
        data_bittiming_const: Some(PUCAN_DATA),
        ..controller("pcan_usb_fd", PUCAN_NOMINAL, &[clk(80_000_000)])
    },
    // platform and PCI
    controller(
        "softing",
        limits((1, 16), (1, 8), 4, (1, 32)),
        &[clk(8_000_000), clk(16_000_000)],
    ),
    Controller {
        encoder: Some(Encoder::At91),
        ..controller(
            "at91",
            limits((4, 16), (2, 8), 4, (2, 128)),
            &[named(99_532_800, "ronetix PM9263"), clk(100_000_000)],
        )
    },
    controller("cc770", CLASSIC_64, &[clk(8_000_000)]),
    Controller {
        encoder: Some(Encoder::CCan),
        ..controller(
            "c_can",
            limits((2, 16), (1, 8), 4, (1, 1024)),
            &[clk(24_000_000)],
        )
    },
    Controller {
        encoder: Some(Encoder::Flexcan),
        ..controller(
            "flexcan",
            limits((4, 16), (2, 8), 4, (1, 256)),
            &[
                named(24_000_000, "mx28"),
                named(30_000_000, "mx6"),
                clk(49_875_000),
                clk(66_000_000),
                named(66_500_000, "mx25"),
                clk(66_666_666),
                named(83_368_421, "vybrid"),
            ],
        )
    },
    Controller {
        data_bittiming_const: Some(limits((2, 39), (2, 8), 4, (1, 1024))),
        ..controller(
            "flexcan-fd",
            limits((2, 96), (2, 32), 16, (1, 1024)),
            CIA_FD_CLOCKS,
        )
    },
    // register fields are stored minus one: PS1 1..15, PS2 2..8, SCALER 0..255
    controller("grcan", limits((2, 16), (2, 8), 4, (1, 256)), &[]),
    Controller {
        data_bittiming_const: Some(limits((1, 256), (2, 256), 128, (2, 512))),
        ..controller(
            "ifi_canfd",
            limits((1, 256), (2, 256), 128, (2, 512)),
            CIA_FD_CLOCKS,
        )
    },
    controller("janz-ican3", CLASSIC_64, &[clk(8_000_000)]),
    Controller {
        data_bittiming_const: Some(limits((1, 512), (1, 32), 16, (1, 8192))),
        ..controller(
            "kvaser_pciefd",
            limits((1, 512), (1, 32), 16, (1, 8192)),
            CIA_FD_CLOCKS,
        )
    },
    controller(
        "mscan",
        limits((4, 16), (2, 8), 4, (1, 64)),
        &[
            clk(32_000_000),
            clk(33_000_000),
            clk(33_300_000),
            clk(33_333_333),
            named(66_660_000, "mpc5121"),
            named(66_666_666, "mpc5121"),
        ],
    ),
    Controller {
        data_bittiming_const: Some(limits((2, 16), (1, 8), 4, (1, 32))),
        encoder: Some(Encoder::Mcan),
        ..controller(
            "mcan-v3.0",
            limits((2, 64), (1, 16), 16, (1, 1024)),
            CIA_FD_CLOCKS,
        )
    },
    Controller {
        data_bittiming_const: Some(limits((1, 32), (1, 16), 16, (1, 32))),
        encoder: Some(Encoder::Mcan),
        ..controller(
            "mcan-v3.1+",
            limits((2, 256), (2, 128), 128, (1, 512)),
            &[
                named(20_000_000, "CIA recommendation"),
                named(40_000_000, "CIA recommendation"),
                named(24_000_000, "stm32mp1 - ck_hse"),
                named(24_573_875, "stm32mp1 - pll3_q"),
                named(29_700_000, "stm32mp1 - pll4_q"),
                named(48_000_000, "stm32mp1 lxatac (new)"),
                named(60_000_000, "stm32mp1 ecu02.5- pll4_r"),
                named(62_500_000, "stm32mp1 lxatac (old) - pll4_r"),
                named(74_250_000, "stm32mp1 - pll4_r"),
            ],
        )
    },
    Controller {
        data_bittiming_const: Some(PUCAN_DATA),
        ..controller(
            "peak_canfd",
            PUCAN_NOMINAL,
            &[
                clk(20_000_000),
                clk(24_000_000),
                clk(30_000_000),
                clk(40_000_000),
                clk(60_000_000),
                clk(80_000_000),
            ],
        )
    },
    Controller {
        encoder: Some(Encoder::Sja1000),
        ..controller(
            "sja1000",
            CLASSIC_64,
            &[clk(16_000_000 / 2), named(24_000_000 / 2, "f81601")],
        )
    },
    controller("sun4i_can", CLASSIC_64, &[]),
    Controller {
        encoder: Some(Encoder::TiHecc),
        ..controller("ti_hecc", CLASSIC_256, &[clk(13_000_000)])
    },
    controller("xilinx_can", CLASSIC_256, &[]),
    Controller {
        data_bittiming_const: Some(limits((1, 16), (1, 8), 8, (1, 256))),
        ..controller(
            "xilinx_can_fd",
            limits((1, 64), (1, 16), 16, (1, 256)),
            CIA_FD_CLOCKS,
        )
    },
    Controller {
        data_bittiming_const: Some(limits((1, 32), (1, 16), 16, (2, 256))),
        ..controller(
            "xilinx_can_fd2",
            limits((1, 256), (1, 128), 128, (2, 256)),
            &[
                named(20_000_000, "CIA recommendation"),
                named(40_000_000, "CIA recommendation"),
                named(79_999_999, "Versal ACAP"),
                named(80_000_000, "Versal ACAP"),
            ],
        )
    },
];
