// cargo test -p channel-shift --test batch_test

use anyhow::Result;
use channel_shift::{
    BatchConfig, BatchPipeline, BatchSummary, ChannelShiftError, FileStage, FixedThresholds,
    Thresholds,
    batch::{discover, process_file},
};
use image::{Rgb, RgbImage};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::tempdir;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_jpeg(path: &Path, width: u32, height: u32) -> Result<()> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
    });
    image.save(path)?;
    Ok(())
}

fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

fn is_stamped(name: &str, stem: &str) -> bool {
    name.strip_prefix(&format!("{stem}-"))
        .and_then(|rest| rest.strip_suffix(".jpg"))
        .map(|stamp| !stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

#[tokio::test]
async fn test_discover_selects_only_jpeg_names() -> Result<()> {
    let src = tempdir()?;
    write_jpeg(&src.path().join("a.jpg"), 8, 8)?;
    write_jpeg(&src.path().join("b.jpeg"), 8, 8)?;
    fs::write(src.path().join("c.png"), b"png")?;
    fs::write(src.path().join("D.JPG"), b"upper case suffix")?;

    let files = discover(src.path()).await?;
    let names: Vec<_> = files
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["a.jpg", "b.jpeg"]);
    assert!(files.iter().all(|p| p.is_absolute()));
    Ok(())
}

#[tokio::test]
async fn test_discover_missing_dir() {
    let src = tempdir().unwrap();
    let missing = src.path().join("nope");

    assert!(matches!(
        discover(&missing).await,
        Err(ChannelShiftError::DirectoryRead { .. })
    ));
}

#[tokio::test]
async fn test_run_isolates_failures() -> Result<()> {
    init_logger();

    let src = tempdir()?;
    let dst = tempdir()?;
    write_jpeg(&src.path().join("a.jpg"), 48, 32)?;
    fs::write(src.path().join("b.jpeg"), b"corrupt")?;
    fs::write(src.path().join("c.png"), b"ignored")?;

    let summary = BatchPipeline::new(BatchConfig::new(src.path(), dst.path()))
        .run()
        .await?;

    assert_eq!(
        summary,
        BatchSummary {
            discovered: 2,
            created: 1,
            failed: 1
        }
    );

    let outputs = file_names(dst.path())?;
    assert_eq!(outputs.len(), 1);
    assert!(is_stamped(&outputs[0], "a"), "unexpected name {}", outputs[0]);

    let output = image::open(dst.path().join(&outputs[0]))?;
    assert_eq!((output.width(), output.height()), (48, 32));
    Ok(())
}

#[tokio::test]
async fn test_run_missing_source_dir() {
    let dst = tempdir().unwrap();
    let pipeline = BatchPipeline::new(BatchConfig::new(dst.path().join("missing"), dst.path()));

    assert!(matches!(
        pipeline.run().await,
        Err(ChannelShiftError::DirectoryRead { .. })
    ));
}

#[tokio::test]
async fn test_run_missing_target_dir_fails_each_file() -> Result<()> {
    init_logger();

    let src = tempdir()?;
    write_jpeg(&src.path().join("a.jpg"), 24, 24)?;
    write_jpeg(&src.path().join("b.jpg"), 24, 24)?;
    let target = src.path().join("not-created");

    let summary = BatchPipeline::new(BatchConfig::new(src.path(), &target))
        .run()
        .await?;

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.failed, 2);
    assert!(!target.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_empty_dir() -> Result<()> {
    let src = tempdir()?;
    let dst = tempdir()?;

    let summary = BatchPipeline::new(BatchConfig::new(src.path(), dst.path()))
        .run()
        .await?;

    assert_eq!(summary, BatchSummary::default());
    Ok(())
}

#[tokio::test]
async fn test_run_with_concurrency_cap() -> Result<()> {
    let src = tempdir()?;
    let dst = tempdir()?;
    for name in ["one.jpg", "two.jpg", "three.jpeg", "four.jpg"] {
        write_jpeg(&src.path().join(name), 30, 30)?;
    }

    let config = BatchConfig::new(src.path(), dst.path())
        .with_max_concurrency(Some(1))
        .with_quality(95);
    let summary = BatchPipeline::new(config).run().await?;

    assert_eq!(summary.created, 4);
    assert_eq!(file_names(dst.path())?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_run_rejects_invalid_config() {
    let dir = tempdir().unwrap();

    let zero_cap = BatchConfig::new(dir.path(), dir.path()).with_max_concurrency(Some(0));
    assert!(matches!(
        BatchPipeline::new(zero_cap).run().await,
        Err(ChannelShiftError::InvalidParameter(_))
    ));

    for quality in [10, 79, 150] {
        let bad_quality = BatchConfig::new(dir.path(), dir.path()).with_quality(quality);
        assert!(matches!(
            BatchPipeline::new(bad_quality).run().await,
            Err(ChannelShiftError::InvalidParameter(_))
        ));
    }
}

#[tokio::test]
async fn test_run_low_quality_writes_nothing() -> Result<()> {
    let src = tempdir()?;
    let dst = tempdir()?;
    write_jpeg(&src.path().join("a.jpg"), 16, 16)?;

    let config = BatchConfig::new(src.path(), dst.path()).with_quality(10);
    assert!(BatchPipeline::new(config).run().await.is_err());
    assert!(file_names(dst.path())?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_process_file_naming() -> Result<()> {
    let src = tempdir()?;
    let dst = tempdir()?;
    let source = src.path().join("photo.jpg");
    write_jpeg(&source, 40, 20)?;

    let before = cutil::time::timestamp_millis();
    let fixed = FixedThresholds(Thresholds::new(5, 5, 5));
    let target = process_file(&source, dst.path(), 80, &fixed).await?;
    let after = cutil::time::timestamp_millis();

    assert_eq!(target.parent(), Some(dst.path()));
    let name = target.file_name().unwrap().to_string_lossy().into_owned();
    assert!(is_stamped(&name, "photo"), "unexpected name {name}");

    let stamp: i64 = name["photo-".len()..name.len() - ".jpg".len()].parse()?;
    assert!((before..=after).contains(&stamp));
    Ok(())
}

#[tokio::test]
async fn test_process_file_reports_stage() -> Result<()> {
    let src = tempdir()?;
    let source = src.path().join("broken.jpg");
    fs::write(&source, b"not a jpeg")?;

    let fixed = FixedThresholds(Thresholds::new(5, 5, 5));
    let err = process_file(&source, src.path(), 80, &fixed)
        .await
        .unwrap_err();

    assert_eq!(err.stage, FileStage::Discovered);
    assert_eq!(err.path, source);
    assert!(matches!(err.error, ChannelShiftError::Decode { .. }));

    let good = src.path().join("good.jpg");
    write_jpeg(&good, 16, 16)?;
    let err = process_file(&good, &src.path().join("missing"), 80, &fixed)
        .await
        .unwrap_err();

    assert_eq!(err.stage, FileStage::Transformed);
    assert!(matches!(err.error, ChannelShiftError::Write { .. }));
    Ok(())
}

#[tokio::test]
async fn test_fixed_thresholds_are_reproducible() -> Result<()> {
    let src = tempdir()?;
    let source = src.path().join("same.jpg");
    write_jpeg(&source, 64, 48)?;

    let fixed = FixedThresholds(Thresholds::new(9, 14, 6));
    let first = process_file(&source, &out_dir(&src, "first")?, 90, &fixed).await?;
    let second = process_file(&source, &out_dir(&src, "second")?, 90, &fixed).await?;

    assert_eq!(fs::read(first)?, fs::read(second)?);
    Ok(())
}

#[tokio::test]
async fn test_run_uses_injected_thresholds() -> Result<()> {
    init_logger();

    let src = tempdir()?;
    let source = src.path().join("scene.jpg");
    write_jpeg(&source, 56, 40)?;

    let fixed = Thresholds::new(17, 8, 12);
    let batch_dir = out_dir(&src, "batch")?;
    let config = BatchConfig::new(src.path(), &batch_dir).with_quality(90);
    let summary = BatchPipeline::new(config)
        .with_threshold_source(FixedThresholds(fixed))
        .run()
        .await?;
    assert_eq!(summary.created, 1);

    let outputs = file_names(&batch_dir)?;
    assert_eq!(outputs.len(), 1);

    let single_dir = out_dir(&src, "single")?;
    let single = process_file(&source, &single_dir, 90, &FixedThresholds(fixed)).await?;
    assert_eq!(fs::read(batch_dir.join(&outputs[0]))?, fs::read(single)?);
    Ok(())
}

fn out_dir(root: &tempfile::TempDir, name: &str) -> Result<PathBuf> {
    let dir = root.path().join(name);
    fs::create_dir(&dir)?;
    Ok(dir)
}
