use crate::config::DetectionConfig;
use crate::detection::yolo::{self, YoloLayout, CANDIDATE_FLOOR};
use crate::detection::DetectionEngine;
use crate::diagnostics::LogManager;
use crate::model::Detection;
use crate::prelude::{ChannelOrder, Frame, GcsError, GcsResult};
use opencv::{
    core::{Mat, Scalar, Size, CV_32F},
    dnn,
    prelude::*,
};

/// YOLOv8 ONNX export run through the OpenCV DNN module.
pub struct YoloEngine {
    net: dnn::Net,
    input_size: u32,
    iou_threshold: f32,
    logger: LogManager,
}

impl YoloEngine {
    pub fn load(config: &DetectionConfig) -> GcsResult<Self> {
        let net = dnn::read_net_from_onnx(&config.model_path)
            .map_err(|err| GcsError::Detection(format!("{}: {}", config.model_path, err)))?;
        let logger = LogManager::new("detection");
        logger.record(&format!("loaded model {}", config.model_path));
        Ok(Self {
            net,
            input_size: config.input_size,
            iou_threshold: config.iou_threshold,
            logger,
        })
    }

    fn infer(&mut self, frame: &Frame) -> opencv::Result<GcsResult<Vec<Detection>>> {
        let flat = Mat::from_slice(&frame.data)?;
        let image = flat.reshape(3, frame.height as i32)?;

        let side = self.input_size as i32;
        let blob = dnn::blob_from_image(
            &image,
            1.0 / 255.0,
            Size::new(side, side),
            Scalar::default(),
            frame.order == ChannelOrder::Bgr,
            false,
            CV_32F,
        )?;
        self.net.set_input(&blob, "", 1.0, Scalar::default())?;
        let output = self.net.forward_single("")?;

        let dims = output.mat_size();
        if dims.len() != 3 {
            return Ok(Err(GcsError::Detection(format!(
                "unexpected output rank {}",
                dims.len()
            ))));
        }
        let layout = YoloLayout {
            rows: dims[1] as usize,
            anchors: dims[2] as usize,
            input_size: self.input_size,
            frame_width: frame.width,
            frame_height: frame.height,
        };
        let values = output.data_typed::<f32>()?;
        Ok(yolo::decode(values, &layout, CANDIDATE_FLOOR)
            .map(|candidates| yolo::suppress(candidates, self.iou_threshold)))
    }
}

impl DetectionEngine for YoloEngine {
    fn detect(&mut self, frame: &Frame) -> GcsResult<Vec<Detection>> {
        let detections = self
            .infer(frame)
            .map_err(|err| GcsError::Detection(err.to_string()))??;
        self.logger
            .trace(&format!("{} detections after suppression", detections.len()));
        Ok(detections)
    }
}
