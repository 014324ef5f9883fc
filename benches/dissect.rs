use clock_sync_observer::{dissect_frame, CaptureTimestamp, Dissector, Frame, Linktype};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hex_literal::hex;

const NTP_IPV4: &[u8] = &hex!(
    "
00 11 22 33 44 55 66 77 88 99 aa bb 08 00
45 00 00 4c 12 34 40 00 40 11 00 00 c0 a8 01 0a c0 a8 01 01
c3 50 00 7b 00 38 00 00
23 02 06 e9 00 00 01 23 00 00 04 56 c0 a8 01 01
e7 5a 1b 2c 80 00 00 00 00 00 00 00 00 00 00 00
e7 5a 1b 30 12 34 56 78 e7 5a 1b 30 9a bc de f0"
);

// IPv6 header chained into a second IPv6 header
const NTP_IPV6_CHAINED: &[u8] = &hex!(
    "
00 11 22 33 44 55 66 77 88 99 aa bb 86 dd
60 00 00 00 00 60 29 40
20 01 0d b8 00 00 00 00 00 00 00 00 00 00 00 01
20 01 0d b8 00 00 00 00 00 00 00 00 00 00 00 02
60 00 00 00 00 38 11 40
20 01 0d b8 00 00 00 00 00 00 00 00 00 00 00 01
20 01 0d b8 00 00 00 00 00 00 00 00 00 00 00 02
00 7b 00 7b 00 38 00 00
24 01 00 ec 00 00 00 00 00 00 00 00 47 50 53 00
e7 5a 1b 30 00 00 00 00 e7 5a 1b 30 9a bc de f0
e7 5a 1b 30 9a c0 00 00 e7 5a 1b 30 9a c1 00 00"
);

fn bench_dissect_ipv4(c: &mut Criterion) {
    let frame = Frame::new(NTP_IPV4, CaptureTimestamp::new(1_700_000_000, 0));
    c.bench_function("dissect ipv4", |b| b.iter(|| dissect_frame(black_box(&frame))));
}

fn bench_dissect_ipv6(c: &mut Criterion) {
    let frame = Frame::new(NTP_IPV6_CHAINED, CaptureTimestamp::new(1_700_000_000, 0));
    c.bench_function("dissect ipv6 chained", |b| {
        b.iter(|| dissect_frame(black_box(&frame)))
    });
}

fn bench_dissect_all(c: &mut Criterion) {
    let frames: Vec<_> = (0..64u64)
        .map(|i| {
            let data = if i % 2 == 0 { NTP_IPV4 } else { NTP_IPV6_CHAINED };
            Frame::new(data, CaptureTimestamp::new(i, 0))
        })
        .collect();
    let dissector = Dissector::new(Linktype::ETHERNET);
    c.bench_function("dissect_all 64 frames", |b| {
        b.iter(|| dissector.dissect_all(frames.iter().copied()).count())
    });
}

criterion_group!(
    benches,
    bench_dissect_ipv4,
    bench_dissect_ipv6,
    bench_dissect_all
);
criterion_main!(benches);
