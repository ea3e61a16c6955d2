// APU test suites

mod status_tests;

use super::Apu;

/// Clock the APU for a number of CPU cycles, ignoring DMC fetches
pub(super) fn run_cycles(apu: &mut Apu, cycles: u32) {
    for _ in 0..cycles {
        let _ = apu.clock();
    }
}
