//! Integration tests for the mirage crates.
//!
//! End-to-end flows across the engine and the file boundary: images are
//! encoded to real files, read back and pushed through compose/recover.

#[cfg(test)]
mod tests {
    use mirage_core::{GridSpec, Parity, PixelBuffer};
    use mirage_ops::grade::{grade_value, GradeSettings};
    use mirage_ops::pipeline::{compose_images, recover_image, recovery_preview, ComposeSettings, RecoverSettings};
    use mirage_ops::{Filter, Histogram, Preset};
    use serde::de::DeserializeOwned;
    use tempfile::tempdir;

    fn json_round_trip<T: serde::Serialize + DeserializeOwned>(value: &T) -> T {
        let text = serde_json::to_string(value).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    /// Horizontal gray ramp.
    fn ramp(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                let v = (x * 255 / (w - 1).max(1)) as u8;
                buf.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        buf
    }

    #[test]
    fn test_compose_file_round_trip() {
        let dir = tempdir().unwrap();
        let carrier_path = dir.path().join("carrier.png");
        let hidden_path = dir.path().join("hidden.bmp");
        let out_path = dir.path().join("tank.png");

        mirage_io::write(&carrier_path, &PixelBuffer::filled(12, 8, [200, 0, 0, 255]).unwrap()).unwrap();
        mirage_io::write(&hidden_path, &PixelBuffer::filled(5, 5, [0, 0, 200, 255]).unwrap()).unwrap();

        let carrier = mirage_io::read(&carrier_path).unwrap();
        let hidden = mirage_io::read(&hidden_path).unwrap();
        let settings = ComposeSettings {
            carrier: GradeSettings::identity(),
            hidden: GradeSettings::identity(),
            ..ComposeSettings::default()
        };
        let out = compose_images(&carrier, &hidden, &settings).unwrap();
        mirage_io::write(&out_path, &out.composite).unwrap();

        // PNG is lossless, so the checkerboard survives the file exactly.
        let composite = mirage_io::read(&out_path).unwrap();
        assert_eq!(composite, out.composite);

        let rec = recover_image(
            &composite,
            &RecoverSettings {
                reveal: None,
                ..RecoverSettings::default()
            },
        )
        .unwrap();
        assert_eq!(rec.image.dimensions(), (12, 8));
        assert!(rec.image.pixels().all(|(_, _, px)| px == [0, 0, 200, 255]));
    }

    #[test]
    fn test_default_flow_hides_and_reveals() {
        // White carrier, black hidden: default levels squeeze both into a
        // narrow band, the reveal grade pulls them apart again.
        let carrier = PixelBuffer::filled(16, 16, [255, 255, 255, 255]).unwrap();
        let hidden = PixelBuffer::filled(16, 16, [0, 0, 0, 255]).unwrap();
        let out = compose_images(&carrier, &hidden, &ComposeSettings::default()).unwrap();

        assert_eq!(out.composite.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(out.composite.pixel(1, 0), [0, 0, 0, 255]);

        let rec = recover_image(&out.composite, &RecoverSettings::default()).unwrap();
        let expected = grade_value(0, &GradeSettings::reveal());
        assert!(rec.image.pixels().all(|(_, _, px)| px[0] == expected));
        assert_eq!(rec.histogram.total(), 256);
    }

    #[test]
    fn test_macro_cells_round_trip() {
        let carrier = ramp(24, 24);
        let hidden = PixelBuffer::filled(24, 24, [10, 20, 30, 255]).unwrap();
        let grid = GridSpec::new(4, Parity::Odd).unwrap();
        let settings = ComposeSettings {
            carrier: GradeSettings::identity(),
            hidden: GradeSettings::identity(),
            grid,
            filter: Filter::Nearest,
        };
        let out = compose_images(&carrier, &hidden, &settings).unwrap();
        for (x, y, px) in out.composite.pixels() {
            if grid.is_layer_a(x, y) {
                assert_eq!(px, carrier.pixel(x, y));
            } else {
                assert_eq!(px, [10, 20, 30, 255]);
            }
        }

        let rec = recover_image(
            &out.composite,
            &RecoverSettings {
                grid,
                hidden: grid.layer_b_parity(),
                reveal: None,
            },
        )
        .unwrap();
        // Uniform hidden layer: every estimate is the exact mean.
        assert!(rec.image.pixels().all(|(_, _, px)| px == [10, 20, 30, 255]));
    }

    #[test]
    fn test_preset_file_drives_flows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preset.yaml");
        std::fs::write(
            &path,
            "grid:\n  cell_size: 2\n  parity: odd\nreveal:\n  exposure: 1.0\nfilter: nearest\n",
        )
        .unwrap();

        let preset = mirage_io::preset::load_preset(&path).unwrap();
        assert_eq!(preset.grid, GridSpec::new(2, Parity::Odd).unwrap());
        assert_eq!(preset.reveal.exposure, 1.0);
        assert_eq!(preset.reveal.brightness, 80.0);
        assert_eq!(preset.reveal.contrast, 100.0);
        assert_eq!(preset.carrier, GradeSettings::carrier());

        let recover = preset.recover_settings();
        assert_eq!(recover.hidden, Parity::Even);
        assert_eq!(recover.grid.cell_size, 2);
        assert_eq!(json_round_trip(&preset), preset);
    }

    #[test]
    fn test_flow_settings_partial_grades() {
        let compose: ComposeSettings = serde_json::from_str(r#"{"hidden": {"exposure": 1.0}}"#).unwrap();
        assert_eq!(compose.hidden.levels, GradeSettings::hidden().levels);
        assert_eq!(compose.hidden.exposure, 1.0);
        assert_eq!(compose.carrier, GradeSettings::carrier());

        let recover: RecoverSettings = serde_json::from_str(r#"{"reveal": {"contrast": 50.0}}"#).unwrap();
        assert_eq!(
            recover.reveal,
            Some(GradeSettings {
                contrast: 50.0,
                ..GradeSettings::reveal()
            })
        );

        let raw: RecoverSettings = serde_json::from_str(r#"{"reveal": null}"#).unwrap();
        assert_eq!(raw.reveal, None);
        assert_eq!(json_round_trip(&recover), recover);
    }

    #[test]
    fn test_preview_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.webp");
        let composite = ramp(9, 3);
        let preview = recovery_preview(&composite, &Preset::default().reveal).unwrap();
        mirage_io::write(&path, &preview).unwrap();
        assert_eq!(mirage_io::read(&path).unwrap(), preview);
    }

    #[test]
    fn test_histogram_json() {
        let hist = Histogram::compute(&ramp(256, 2));
        assert_eq!(hist.total(), 512);
        assert!(hist.bins().iter().all(|&v| v == 2));

        let value = serde_json::to_value(&hist).unwrap();
        assert_eq!(value["bins"].as_array().map(|a| a.len()), Some(256));
        assert_eq!(json_round_trip(&hist), hist);
    }

    #[test]
    fn test_jpeg_carrier_is_opaque() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("carrier.jpg");
        mirage_io::write(&path, &PixelBuffer::filled(8, 8, [120, 120, 120, 40]).unwrap()).unwrap();
        let back = mirage_io::read(&path).unwrap();
        assert!(back.pixels().all(|(_, _, px)| px[3] == 255));
    }
}
