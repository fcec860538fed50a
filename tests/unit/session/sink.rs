use super::*;

fn solid(width: u32, height: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: px.repeat((width * height) as usize),
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_keeps_push_order() {
    let mut sink = InMemorySink::new();
    sink.push_frame("a", 0, &solid(1, 1, [0, 0, 0, 255])).unwrap();
    sink.push_frame("b", 0, &solid(1, 1, [0, 0, 0, 255])).unwrap();
    sink.push_frame("a", 3, &solid(1, 1, [0, 0, 0, 255])).unwrap();
    sink.finish().unwrap();

    assert_eq!(sink.frames().len(), 3);
    assert_eq!(sink.ticks_for("a"), vec![0, 3]);
    assert_eq!(sink.ticks_for("b"), vec![0]);
    assert!(sink.ticks_for("c").is_empty());
}

#[test]
fn png_sink_writes_straight_alpha_files() {
    let dir = std::env::temp_dir().join(format!("prism-canvas-sink-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = PngSequenceSink::new(dir.clone()).unwrap();
    sink.push_frame("hero", 7, &solid(2, 2, [64, 0, 0, 128])).unwrap();
    assert_eq!(sink.written().to_vec(), vec![dir.join("hero-00007.png")]);

    let img = image::open(dir.join("hero-00007.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 2));
    let px = img.get_pixel(1, 1).0;
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 128).abs() <= 1);

    std::fs::remove_dir_all(&dir).unwrap();
}
