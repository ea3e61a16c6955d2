// $4015 status and frame IRQ behavior

use super::run_cycles;
use crate::apu::Apu;

#[test]
fn test_power_on_status_is_clear() {
    let mut apu = Apu::new();
    assert_eq!(apu.read_status(), 0);
    assert!(!apu.irq_pending());
}

#[test]
fn test_frame_irq_raised_in_4_step_mode() {
    let mut apu = Apu::new();

    run_cycles(&mut apu, 29829);
    assert!(apu.irq_pending(), "frame IRQ at the end of the sequence");

    let status = apu.read_status();
    assert_eq!(status & 0x40, 0x40, "bit 6 reports the frame IRQ");
    assert!(!apu.irq_pending(), "reading $4015 clears it");

    let status = apu.read_status();
    assert_eq!(status & 0x40, 0, "second read sees it clear");
}

#[test]
fn test_irq_inhibit_via_4017() {
    let mut apu = Apu::new();

    apu.write_register(0x4017, 0x40);
    run_cycles(&mut apu, 2 * 29830);
    assert!(!apu.irq_pending(), "inhibited sequencer never raises IRQ");
}

#[test]
fn test_5_step_mode_has_no_irq() {
    let mut apu = Apu::new();

    apu.write_register(0x4017, 0x80);
    run_cycles(&mut apu, 2 * 37282);
    assert!(!apu.irq_pending());
}

#[test]
fn test_audio_samples_accumulate() {
    let mut apu = Apu::new();

    // One frame of CPU time at 44.1 kHz is ~735 samples
    run_cycles(&mut apu, 29830);
    let queued = apu.queued_samples();
    assert!(
        (700..=800).contains(&queued),
        "~735 samples expected, got {}",
        queued
    );
}

#[test]
fn test_status_reflects_all_channels() {
    let mut apu = Apu::new();

    apu.write_register(0x4015, 0x1F);
    apu.write_register(0x4003, 0x10);
    apu.write_register(0x4007, 0x10);
    apu.write_register(0x400B, 0x10);
    apu.write_register(0x400F, 0x10);
    apu.write_register(0x4013, 0x01); // DMC length 17
    apu.write_register(0x4015, 0x1F); // restart DMC with bytes pending

    let status = apu.read_status();
    assert_eq!(status & 0x1F, 0x1F, "all five channels report active");
}
