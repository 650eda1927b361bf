use std::path::Path;
use std::time::Instant;

use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::region_filter::filter_usable_regions;
use crate::pixelation::domain::region_pixelator::RegionPixelator;
use crate::shared::region::Region;

/// Single-image redaction pipeline: read → filter → pixelate → write.
pub struct PixelateImageUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    pixelator: Box<dyn RegionPixelator>,
    min_region_size: f64,
    logger: Box<dyn PipelineLogger>,
}

impl PixelateImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        pixelator: Box<dyn RegionPixelator>,
        min_region_size: f64,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            writer,
            pixelator,
            min_region_size,
            logger,
        }
    }

    /// Pixelates `regions` of the image at `input_path` and writes the
    /// result to `output_path`. Returns the number of regions applied.
    ///
    /// Nothing is written if decoding or pixelation fails.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        regions: &[Region],
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let start = Instant::now();
        let raster = self.reader.read(input_path)?;
        self.logger.timing("decode", elapsed_ms(start));

        let usable = filter_usable_regions(regions, self.min_region_size);
        let skipped = regions.len() - usable.len();
        if skipped > 0 {
            log::warn!(
                "Ignoring {skipped} region(s) not larger than {}px",
                self.min_region_size
            );
        }
        self.logger.metric("region_count", usable.len() as f64);
        self.logger.metric("skipped_regions", skipped as f64);

        let start = Instant::now();
        let output = self.pixelator.pixelate(&raster, &usable)?;
        self.logger.timing("pixelate", elapsed_ms(start));

        let start = Instant::now();
        self.writer.write(output_path, &output)?;
        self.logger.timing("encode", elapsed_ms(start));

        self.logger.info(&format!(
            "Pixelated {} region(s) with block size {}",
            usable.len(),
            self.pixelator.block_size()
        ));
        self.logger.summary();
        Ok(usable.len())
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::pixelation::domain::pixelate_error::PixelateError;
    use crate::pixelation::infrastructure::block_pixelator::BlockPixelator;
    use crate::shared::raster::Raster;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubImageReader {
        raster: Raster,
    }

    impl ImageReader for StubImageReader {
        fn read(&self, _path: &Path) -> Result<Raster, Box<dyn std::error::Error>> {
            Ok(self.raster.clone())
        }
    }

    struct FailingImageReader;

    impl ImageReader for FailingImageReader {
        fn read(&self, _path: &Path) -> Result<Raster, Box<dyn std::error::Error>> {
            Err("decode failed".into())
        }
    }

    type Written = Arc<Mutex<Vec<(PathBuf, Raster)>>>;

    struct StubImageWriter {
        written: Written,
    }

    impl StubImageWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, raster: &Raster) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), raster.clone()));
            Ok(())
        }
    }

    struct RecordingPixelator {
        calls: Arc<Mutex<Vec<Vec<Region>>>>,
    }

    impl RegionPixelator for RecordingPixelator {
        fn pixelate(&self, raster: &Raster, regions: &[Region]) -> Result<Raster, PixelateError> {
            self.calls.lock().unwrap().push(regions.to_vec());
            Ok(raster.clone())
        }

        fn block_size(&self) -> u32 {
            1
        }
    }

    // --- Helpers ---

    fn use_case(
        raster: Raster,
        writer: StubImageWriter,
        pixelator: Box<dyn RegionPixelator>,
    ) -> PixelateImageUseCase {
        PixelateImageUseCase::new(
            Box::new(StubImageReader { raster }),
            Box::new(writer),
            pixelator,
            10.0,
            Box::new(NullPipelineLogger),
        )
    }

    // --- Tests ---

    #[test]
    fn test_undersized_regions_are_filtered_before_pixelation() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let pixelator = RecordingPixelator {
            calls: calls.clone(),
        };
        let mut uc = use_case(
            Raster::filled(100, 100, [0, 0, 0, 255]),
            StubImageWriter::new(),
            Box::new(pixelator),
        );

        let regions = [
            Region::new(0.0, 0.0, 40.0, 40.0),
            Region::new(50.0, 50.0, 8.0, 40.0),
        ];
        let applied = uc
            .execute(Path::new("in.png"), Path::new("out.png"), &regions)
            .unwrap();

        assert_eq!(applied, 1);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![regions[0]]);
    }

    #[test]
    fn test_writes_pixelated_raster() {
        let mut raster = Raster::filled(20, 20, [255, 0, 0, 255]);
        raster.set_pixel(0, 0, [0, 0, 255, 255]);
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let mut uc = use_case(raster, writer, Box::new(BlockPixelator::new(20).unwrap()));

        uc.execute(
            Path::new("in.png"),
            Path::new("out.png"),
            &[Region::new(0.0, 0.0, 20.0, 20.0)],
        )
        .unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        // (255*399) / 400 = 254, 255 / 400 = 0
        assert_eq!(written[0].1.pixel(0, 0), Some([254, 0, 0, 255]));
        assert_eq!(written[0].1.pixel(19, 19), Some([254, 0, 0, 255]));
    }

    #[test]
    fn test_no_regions_still_writes_image() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let raster = Raster::filled(12, 8, [1, 2, 3, 4]);
        let mut uc = use_case(
            raster.clone(),
            writer,
            Box::new(BlockPixelator::new(4).unwrap()),
        );

        let applied = uc
            .execute(Path::new("in.png"), Path::new("out.png"), &[])
            .unwrap();

        assert_eq!(applied, 0);
        assert_eq!(written.lock().unwrap()[0].1, raster);
    }

    #[test]
    fn test_empty_raster_fails_without_writing() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let mut uc = use_case(
            Raster::new(Vec::new(), 0, 0),
            writer,
            Box::new(BlockPixelator::new(4).unwrap()),
        );

        let result = uc.execute(Path::new("in.png"), Path::new("out.png"), &[]);

        assert!(result.is_err());
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_decode_failure_propagates() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let mut uc = PixelateImageUseCase::new(
            Box::new(FailingImageReader),
            Box::new(writer),
            Box::new(BlockPixelator::new(4).unwrap()),
            10.0,
            Box::new(NullPipelineLogger),
        );

        let result = uc.execute(Path::new("in.png"), Path::new("out.png"), &[]);

        assert_eq!(result.unwrap_err().to_string(), "decode failed");
        assert!(written.lock().unwrap().is_empty());
    }
}
