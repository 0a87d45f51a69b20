use std::path::{Path, PathBuf};

use dipkit::image::{Image, ImageSize};
use dipkit::io::{read_image_bmp, write_image_bmp};
use dipkit::pipeline::{parse_args, run, PipelineConfig, PipelineError};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn checkerboard(side: usize) -> Result<Image<u8, 4>, PipelineError> {
    let data = (0..side * side)
        .flat_map(|i| {
            let (x, y) = (i % side, i / side);
            let v = if (x / 2 + y / 2) % 2 == 0 { 200 } else { 40 };
            [v, v / 2, 255 - v, 255]
        })
        .collect();
    Ok(Image::new(
        ImageSize {
            width: side,
            height: side,
        },
        data,
    )?)
}

fn write_input(dir: &Path, name: &str, image: &Image<u8, 4>) -> Result<PathBuf, PipelineError> {
    let path = dir.join(name);
    write_image_bmp(&path, image)?;
    Ok(path)
}

fn args(tokens: &[&str], images: &[&Path]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| t.to_string())
        .chain(images.iter().map(|p| p.display().to_string()))
        .collect()
}

#[test]
fn runs_operations_and_writes_artefacts() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "board.bmp", &checkerboard(16)?)?;
    let out = tmp.path().join("out");

    let invocation = parse_args(args(
        &[
            "--negative",
            "--brightness",
            "-value=20",
            "--dflip",
            "--enlarge",
            "-value=2",
            "--cmean",
            "--lowpass",
            "-cutoff=4",
            "-spectrum",
        ],
        &[&input],
    ))?;
    let config = PipelineConfig::new().with_output_dir(&out);
    let report = run(&invocation, &config)?;

    let expected = [
        "board_negative.bmp",
        "board_brightness_20.bmp",
        "board_dflip.bmp",
        "board_enlarge_2.bmp",
        "board_lowpass_4.bmp",
        "board_lowpass_4_spectrum.bmp",
    ];
    assert_eq!(
        report.written,
        expected.iter().map(|n| out.join(n)).collect::<Vec<_>>()
    );
    assert!(report.written.iter().all(|p| p.exists()));
    assert_eq!(report.entries.len(), 6);
    assert!(report.result_of("cmean").is_some());

    let enlarged = read_image_bmp(out.join("board_enlarge_2.bmp"))?;
    assert_eq!(enlarged.width(), 32);

    // negative of the decoded input round-trips through the codec exactly
    let original = read_image_bmp(&input)?;
    let negated = read_image_bmp(out.join("board_negative.bmp"))?;
    for (a, b) in original.as_slice().chunks_exact(4).zip(negated.as_slice().chunks_exact(4)) {
        assert_eq!([255 - a[0], 255 - a[1], 255 - a[2]], [b[0], b[1], b[2]]);
    }
    Ok(())
}

#[test]
fn similarity_metrics_against_comparison() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let board = checkerboard(8)?;
    let clean = write_input(tmp.path(), "clean.bmp", &board)?;
    let copy = write_input(tmp.path(), "copy.bmp", &board)?;

    let invocation = parse_args(args(&["--mse", "--psnr", "--md", "--snr"], &[&clean, &copy]))?;
    assert_eq!(invocation.comparison.as_deref(), Some(clean.as_path()));

    let config = PipelineConfig::new().with_output_dir(tmp.path().join("out"));
    let report = run(&invocation, &config)?;
    assert_eq!(report.result_of("mse"), Some("0.000000"));
    assert_eq!(report.result_of("psnr"), Some("inf"));
    assert_eq!(report.result_of("md"), Some("0"));
    assert_eq!(report.result_of("snr"), Some("inf"));
    assert_eq!(report.comparisons.len(), 4);
    assert_eq!(report.comparisons[0].name1, "copy.bmp");
    assert_eq!(report.comparisons[0].name2, "clean.bmp");
    assert!(report.written.is_empty());
    Ok(())
}

#[test]
fn failing_run_writes_nothing() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "in.bmp", &checkerboard(8)?)?;
    let out = tmp.path().join("out");
    let config = PipelineConfig::new().with_output_dir(&out);

    // mse without a comparison image fails after negative already ran
    let invocation = parse_args(args(&["--negative", "--mse"], &[&input]))?;
    assert!(matches!(
        run(&invocation, &config),
        Err(PipelineError::MissingComparison(_))
    ));
    assert!(!out.exists());

    // 12x12 is not a power of two
    let odd = write_input(tmp.path(), "odd.bmp", &checkerboard(12)?)?;
    let invocation = parse_args(args(&["--hflip", "--highpass", "-cutoff=2"], &[&odd]))?;
    assert!(matches!(run(&invocation, &config), Err(PipelineError::Image(_))));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn validation_happens_before_loading() -> TestResult {
    let config = PipelineConfig::default();
    let missing = Path::new("does/not/exist.bmp");

    let invocation = parse_args(args(&["--negative", "--sepia"], &[missing]))?;
    assert!(matches!(
        run(&invocation, &config),
        Err(PipelineError::UnknownOperation(_))
    ));

    let invocation = parse_args(args(&["--dilation", "-se=blob"], &[missing]))?;
    assert!(matches!(run(&invocation, &config), Err(PipelineError::Image(_))));

    let invocation = parse_args(args(&["--negative"], &[missing]))?;
    assert!(matches!(run(&invocation, &config), Err(PipelineError::Io(_))));
    Ok(())
}

#[test]
fn maskpass_reads_mask_directory() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "in.bmp", &checkerboard(8)?)?;
    let masks = tmp.path().join("masks");
    std::fs::create_dir_all(&masks)?;

    // an all black mask keeps only the restored mean
    let black = Image::from_size_pixel(
        ImageSize {
            width: 4,
            height: 4,
        },
        [0, 0, 0, 255],
    )?;
    write_input(&masks, "black.bmp", &black)?;

    let out = tmp.path().join("out");
    let config = PipelineConfig::new()
        .with_output_dir(&out)
        .with_mask_dir(&masks);
    let invocation = parse_args(args(&["--maskpass", "-mask=black"], &[&input]))?;
    let report = run(&invocation, &config)?;
    assert_eq!(report.written, vec![out.join("in_maskpass_black.bmp")]);

    let flat = read_image_bmp(out.join("in_maskpass_black.bmp"))?;
    let first = flat.pixel(0, 0)[0];
    assert!(flat.as_slice().chunks_exact(4).all(|px| px[0] == first));

    let invocation = parse_args(args(&["--maskpass", "-mask=missing"], &[&input]))?;
    assert!(matches!(run(&invocation, &config), Err(PipelineError::Io(_))));
    Ok(())
}

#[test]
fn region_grow_is_seeded_by_config() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "in.bmp", &checkerboard(8)?)?;
    let tokens = ["--region-grow", "-seeds=[0,0][2,0]", "-threshold=10"];

    let mut outputs = Vec::new();
    for (i, seed) in [7u64, 7, 8].into_iter().enumerate() {
        let out = tmp.path().join(format!("out{i}"));
        let config = PipelineConfig::new().with_output_dir(&out).with_seed(seed);
        let report = run(&parse_args(args(&tokens, &[&input]))?, &config)?;
        assert_eq!(report.result_of("region-grow"), Some("2 regions"));
        outputs.push(read_image_bmp(out.join("in_region-grow_2_euclidean_10.bmp"))?);
    }
    assert_eq!(outputs[0], outputs[1]);
    assert_ne!(outputs[0], outputs[2]);
    Ok(())
}
