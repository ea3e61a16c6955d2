// PPU frame benchmark
//
// Renders full frames with background and sprites enabled to track the
// per-dot pipeline cost.

use criterion::{criterion_group, criterion_main, Criterion};
use rusticom::{Cartridge, Mapper, Mirroring, Ppu};

fn build_ppu() -> (Ppu, Option<Mapper>) {
    let mut chr = vec![0u8; 8 * 1024];
    for (i, byte) in chr.iter_mut().enumerate() {
        *byte = (i & 0xFF) as u8;
    }
    let cartridge = Cartridge {
        prg_rom: vec![0; 16 * 1024],
        chr,
        chr_is_ram: false,
        mapper: 0,
        mirroring: Mirroring::Horizontal,
        has_battery: false,
    };
    let mut mapper = Some(Mapper::new(cartridge).unwrap());

    let mut ppu = Ppu::new();
    ppu.write_register(1, 0x18, &mut mapper); // background + sprites
    (ppu, mapper)
}

fn ppu_benchmark(c: &mut Criterion) {
    c.bench_function("ppu_render_frame", |b| {
        b.iter(|| {
            let (mut ppu, mut mapper) = build_ppu();
            while !ppu.step(&mut mapper) {}
            std::hint::black_box(ppu.frame()[0])
        })
    });
}

criterion_group!(benches, ppu_benchmark);
criterion_main!(benches);
