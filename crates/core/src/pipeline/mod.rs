pub mod pipeline_logger;
pub mod pixelate_image_use_case;
pub mod redaction_session;
pub mod region_filter;
