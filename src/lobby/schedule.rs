//! Fixed event schedules (spec §4.2: "enumerated verbatim in the source
//! of truth and reproduced identically by any implementation").
//!
//! Grounded on `original_source/source/pkg4/generator.py::__TIME_TABLES`.
//! Only one 20-minute schedule has ever been observed in a real capture;
//! the 25/30 minute tables are the same schedule offset by 5/10 minutes.

use crate::codec::records::{PlazaEvent, PlazaEventTimestamp};

macro_rules! ts {
    ($at:expr, $event:ident) => {
        PlazaEventTimestamp {
            at_seconds: $at,
            event: PlazaEvent::$event,
        }
    };
}

pub static TIME_TABLES: [[PlazaEventTimestamp; 22]; 3] = [
    // 20 minute schedule.
    [
        ts!(0, OverheadLightingBase),
        ts!(0, StatueLightingBase),
        ts!(0, SpotlightLightingBase),
        ts!(780, StatueEndingPhaseOne),
        ts!(840, OverheadEndingPhaseOne),
        ts!(840, StatueEndingPhaseTwo),
        ts!(900, OverheadEndingPhaseTwo),
        ts!(900, OverheadEndingPhaseThree),
        ts!(900, SpotlightEndingPhaseOne),
        ts!(960, OverheadEndingPhaseThree),
        ts!(960, StatueEndingPhaseTwo),
        ts!(960, SpotlightEndingPhaseTwo),
        ts!(960, EndAllMinigames),
        ts!(1020, OverheadEndingPhaseFour),
        ts!(1020, SpotlightEndingPhaseThree),
        ts!(1020, StartFireworks),
        ts!(1075, CreateParade),
        ts!(1080, OverheadEndingPhaseFive),
        ts!(1080, SpotlightEndingPhaseTwo),
        ts!(1080, EndFireworks),
        ts!(1140, SpotlightLightingBase),
        ts!(1200, ClosePlaza),
    ],
    // 25 minute schedule: the 20 minute schedule offset by 5 minutes.
    [
        ts!(0, OverheadLightingBase),
        ts!(0, StatueLightingBase),
        ts!(0, SpotlightLightingBase),
        ts!(1080, StatueEndingPhaseOne),
        ts!(1140, OverheadEndingPhaseOne),
        ts!(1140, StatueEndingPhaseTwo),
        ts!(1200, OverheadEndingPhaseTwo),
        ts!(1200, OverheadEndingPhaseThree),
        ts!(1200, SpotlightEndingPhaseOne),
        ts!(1260, OverheadEndingPhaseThree),
        ts!(1260, StatueEndingPhaseTwo),
        ts!(1260, SpotlightEndingPhaseTwo),
        ts!(1260, EndAllMinigames),
        ts!(1320, OverheadEndingPhaseFour),
        ts!(1320, SpotlightEndingPhaseThree),
        ts!(1320, StartFireworks),
        ts!(1375, CreateParade),
        ts!(1380, OverheadEndingPhaseFive),
        ts!(1380, SpotlightEndingPhaseTwo),
        ts!(1380, EndFireworks),
        ts!(1440, SpotlightLightingBase),
        ts!(1500, ClosePlaza),
    ],
    // 30 minute schedule: the 20 minute schedule offset by 10 minutes.
    [
        ts!(0, OverheadLightingBase),
        ts!(0, StatueLightingBase),
        ts!(0, SpotlightLightingBase),
        ts!(1380, StatueEndingPhaseOne),
        ts!(1440, OverheadEndingPhaseOne),
        ts!(1440, StatueEndingPhaseTwo),
        ts!(1500, OverheadEndingPhaseTwo),
        ts!(1500, OverheadEndingPhaseThree),
        ts!(1500, SpotlightEndingPhaseOne),
        ts!(1560, OverheadEndingPhaseThree),
        ts!(1560, StatueEndingPhaseTwo),
        ts!(1560, SpotlightEndingPhaseTwo),
        ts!(1560, EndAllMinigames),
        ts!(1620, OverheadEndingPhaseFour),
        ts!(1620, SpotlightEndingPhaseThree),
        ts!(1620, StartFireworks),
        ts!(1675, CreateParade),
        ts!(1680, OverheadEndingPhaseFive),
        ts!(1680, SpotlightEndingPhaseTwo),
        ts!(1680, EndFireworks),
        ts!(1740, SpotlightLightingBase),
        ts!(1800, ClosePlaza),
    ],
];
