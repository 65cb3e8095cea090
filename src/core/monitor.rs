//! The sensor → camera → face API → sink polling loop.

use crate::camera::Camera;
use crate::db::Journal;
use crate::errors::{AppError, AppResult};
use crate::face::FaceDetector;
use crate::hardware::MotionSensor;
use crate::sink::ReportSink;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::time::sleep_while_running;
use chrono::Local;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// What one polling cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoMotion,
    CaptureFailed(String),
    DetectionFailed(String),
    NoFaces,
    Reported {
        faces: usize,
        delivered: usize,
        rejected: usize,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub detections: u64,
    pub delivered: u64,
    pub rejected: u64,
}

pub struct Monitor {
    sensor: Box<dyn MotionSensor>,
    camera: Box<dyn Camera>,
    detector: Box<dyn FaceDetector>,
    sink: Box<dyn ReportSink>,
    journal: Option<Journal>,
    interval: Duration,
}

impl Monitor {
    pub fn new(
        sensor: Box<dyn MotionSensor>,
        camera: Box<dyn Camera>,
        detector: Box<dyn FaceDetector>,
        sink: Box<dyn ReportSink>,
        interval: Duration,
    ) -> Self {
        Self {
            sensor,
            camera,
            detector,
            sink,
            journal: None,
            interval,
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    fn note(&self, operation: &str, message: &str) {
        if let Some(j) = &self.journal {
            j.note(operation, self.sink.name(), message);
        }
    }

    /// Run recoverable failures through the journal and turn them into an
    /// outcome; fatal ones are returned to the caller.
    fn recover(
        &self,
        operation: &str,
        err: AppError,
        outcome: fn(String) -> CycleOutcome,
    ) -> AppResult<CycleOutcome> {
        if !err.is_recoverable() {
            return Err(err);
        }
        error(&err);
        self.note(operation, &err.to_string());
        Ok(outcome(err.to_string()))
    }

    /// One polling cycle. Only fatal errors (sensor, operator input) are
    /// returned as `Err`.
    pub fn cycle(&mut self) -> AppResult<CycleOutcome> {
        if !self.sensor.detected()? {
            info("No human");
            self.note("idle", "No human");
            return Ok(CycleOutcome::NoMotion);
        }
        let at = Local::now();

        info("Human exists!");
        self.note("motion", "Human exists");

        info("Taking a picture...");
        let image = match self.camera.capture().and_then(|path| {
            let bytes = fs::read(&path)?;
            Ok((path, bytes))
        }) {
            Ok((path, bytes)) => {
                log::debug!("captured {} ({} bytes)", path.display(), bytes.len());
                bytes
            }
            Err(e) => return self.recover("capture", e, CycleOutcome::CaptureFailed),
        };
        success("Done.");

        info("Sending the image to the face API...");
        let faces = match self.detector.detect(&image) {
            Ok(faces) => faces,
            Err(e) => return self.recover("detect", e, CycleOutcome::DetectionFailed),
        };
        for face in &faces {
            info(format!("Result --> {}", face.face_attributes));
        }
        self.note("detect", &format!("{} face(s) detected", faces.len()));

        if faces.is_empty() {
            warning("No faces detected");
            return Ok(CycleOutcome::NoFaces);
        }

        info(format!("Sending face attributes to {}...", self.sink.name()));
        if let Err(e) = self.sink.begin(&faces) {
            if !e.is_recoverable() {
                return Err(e);
            }
            error(&e);
            self.note("report", &e.to_string());
            return Ok(CycleOutcome::Reported {
                faces: faces.len(),
                delivered: 0,
                rejected: faces.len(),
            });
        }

        let mut delivered = 0;
        let mut rejected = 0;
        for face in &faces {
            match self.sink.report(face, &at) {
                Ok(()) => {
                    delivered += 1;
                    success(format!("Reported {}", face.face_attributes));
                }
                Err(e) if e.is_recoverable() => {
                    rejected += 1;
                    error(&e);
                }
                Err(e) => return Err(e),
            }
        }
        self.note(
            "report",
            &format!("{} delivered, {} failed", delivered, rejected),
        );

        Ok(CycleOutcome::Reported {
            faces: faces.len(),
            delivered,
            rejected,
        })
    }

    /// Poll until `running` turns false or `max_cycles` cycles have run.
    pub fn run(&mut self, running: &AtomicBool, max_cycles: Option<u64>) -> AppResult<RunSummary> {
        let mut summary = RunSummary::default();

        while running.load(Ordering::SeqCst) {
            let outcome = self.cycle()?;
            summary.cycles += 1;
            if let CycleOutcome::Reported {
                delivered,
                rejected,
                ..
            } = outcome
            {
                summary.detections += 1;
                summary.delivered += delivered as u64;
                summary.rejected += rejected as u64;
            }

            if max_cycles.is_some_and(|max| summary.cycles >= max) {
                break;
            }

            info(format!("Wait {} seconds...", self.interval.as_secs()));
            println!("------------------");
            if !sleep_while_running(self.interval, running) {
                break;
            }
        }

        self.note(
            "stop",
            &format!(
                "{} cycle(s), {} detection(s), {} report(s) delivered",
                summary.cycles, summary.detections, summary.delivered
            ),
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{FaceAttributes, FaceRecord};
    use chrono::DateTime;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls {
        captures: usize,
        detections: usize,
        begins: usize,
        reports: Vec<(FaceRecord, DateTime<Local>)>,
        sensor_drops: usize,
    }

    type Shared = Rc<RefCell<Calls>>;

    struct ScriptedSensor {
        levels: VecDeque<bool>,
        calls: Shared,
        stop_after_read: Option<Arc<AtomicBool>>,
    }

    impl MotionSensor for ScriptedSensor {
        fn detected(&mut self) -> AppResult<bool> {
            if let Some(flag) = &self.stop_after_read {
                flag.store(false, Ordering::SeqCst);
            }
            self.levels
                .pop_front()
                .ok_or_else(|| AppError::Gpio("script exhausted".into()))
        }
    }

    impl Drop for ScriptedSensor {
        fn drop(&mut self) {
            self.calls.borrow_mut().sensor_drops += 1;
        }
    }

    struct FakeCamera {
        image: Option<PathBuf>,
        calls: Shared,
    }

    impl Camera for FakeCamera {
        fn capture(&mut self) -> AppResult<PathBuf> {
            self.calls.borrow_mut().captures += 1;
            self.image
                .clone()
                .ok_or_else(|| AppError::Camera("exit status: 1".into()))
        }
    }

    struct FakeDetector {
        response: fn() -> AppResult<Vec<FaceRecord>>,
        calls: Shared,
    }

    impl FaceDetector for FakeDetector {
        fn detect(&self, image: &[u8]) -> AppResult<Vec<FaceRecord>> {
            assert_eq!(image, b"jpeg-bytes");
            self.calls.borrow_mut().detections += 1;
            (self.response)()
        }
    }

    struct RecordingSink {
        calls: Shared,
        fail_with: Option<fn() -> AppError>,
        begin_fails_with: Option<fn() -> AppError>,
    }

    impl ReportSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn begin(&mut self, _faces: &[FaceRecord]) -> AppResult<()> {
            self.calls.borrow_mut().begins += 1;
            match self.begin_fails_with {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }

        fn report(&mut self, face: &FaceRecord, at: &DateTime<Local>) -> AppResult<()> {
            self.calls.borrow_mut().reports.push((face.clone(), *at));
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }
    }

    fn face(age: f64, gender: &str) -> FaceRecord {
        FaceRecord {
            face_id: None,
            face_attributes: FaceAttributes {
                age,
                gender: gender.into(),
                smile: None,
            },
        }
    }

    fn one_face() -> AppResult<Vec<FaceRecord>> {
        Ok(vec![face(30.0, "female")])
    }

    fn three_faces() -> AppResult<Vec<FaceRecord>> {
        Ok(vec![face(30.0, "female"), face(42.0, "male"), face(7.0, "male")])
    }

    fn no_faces() -> AppResult<Vec<FaceRecord>> {
        Ok(Vec::new())
    }

    fn unauthorized() -> AppResult<Vec<FaceRecord>> {
        Err(AppError::FaceApi {
            status: 401,
            message: "Access denied".into(),
        })
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        calls: Shared,
        monitor: Monitor,
    }

    fn fixture(
        levels: &[bool],
        response: fn() -> AppResult<Vec<FaceRecord>>,
        camera_works: bool,
        fail_with: Option<fn() -> AppError>,
    ) -> Fixture {
        fixture_with_begin(levels, response, camera_works, fail_with, None)
    }

    fn fixture_with_begin(
        levels: &[bool],
        response: fn() -> AppResult<Vec<FaceRecord>>,
        camera_works: bool,
        fail_with: Option<fn() -> AppError>,
        begin_fails_with: Option<fn() -> AppError>,
    ) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cam.jpg");
        fs::write(&image, b"jpeg-bytes").unwrap();

        let calls: Shared = Rc::new(RefCell::new(Calls::default()));
        let monitor = Monitor::new(
            Box::new(ScriptedSensor {
                levels: levels.iter().copied().collect(),
                calls: calls.clone(),
                stop_after_read: None,
            }),
            Box::new(FakeCamera {
                image: camera_works.then_some(image),
                calls: calls.clone(),
            }),
            Box::new(FakeDetector {
                response,
                calls: calls.clone(),
            }),
            Box::new(RecordingSink {
                calls: calls.clone(),
                fail_with,
                begin_fails_with,
            }),
            Duration::ZERO,
        );

        Fixture {
            _dir: dir,
            calls,
            monitor,
        }
    }

    #[test]
    fn no_motion_touches_nothing_else() {
        let mut f = fixture(&[false, false, false], one_face, true, None);
        let running = AtomicBool::new(true);

        let summary = f.monitor.run(&running, Some(3)).unwrap();

        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.detections, 0);
        let calls = f.calls.borrow();
        assert_eq!(calls.captures, 0);
        assert_eq!(calls.detections, 0);
        assert_eq!(calls.begins, 0);
        assert!(calls.reports.is_empty());
    }

    #[test]
    fn one_report_per_face() {
        let mut f = fixture(&[true], three_faces, true, None);

        let outcome = f.monitor.cycle().unwrap();

        assert_eq!(
            outcome,
            CycleOutcome::Reported {
                faces: 3,
                delivered: 3,
                rejected: 0
            }
        );
        let calls = f.calls.borrow();
        assert_eq!(calls.begins, 1);
        let ages: Vec<f64> = calls
            .reports
            .iter()
            .map(|(f, _)| f.face_attributes.age)
            .collect();
        assert_eq!(ages, vec![30.0, 42.0, 7.0]);
    }

    #[test]
    fn single_face_report_carries_attributes_and_cycle_time() {
        let mut f = fixture(&[true], one_face, true, None);

        let before = Local::now();
        f.monitor.cycle().unwrap();
        let after = Local::now();

        let calls = f.calls.borrow();
        assert_eq!(calls.reports.len(), 1);
        let (face, at) = &calls.reports[0];
        assert_eq!(face.face_attributes.age, 30.0);
        assert_eq!(face.face_attributes.gender, "female");
        assert!(*at >= before && *at <= after);
    }

    #[test]
    fn empty_face_list_reports_nothing() {
        let mut f = fixture(&[true], no_faces, true, None);

        assert_eq!(f.monitor.cycle().unwrap(), CycleOutcome::NoFaces);
        let calls = f.calls.borrow();
        assert_eq!(calls.detections, 1);
        assert_eq!(calls.begins, 0);
        assert!(calls.reports.is_empty());
    }

    #[test]
    fn face_api_error_skips_the_cycle() {
        let mut f = fixture(&[true, false], unauthorized, true, None);
        let running = AtomicBool::new(true);

        let summary = f.monitor.run(&running, Some(2)).unwrap();

        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.detections, 0);
        assert!(f.calls.borrow().reports.is_empty());
    }

    #[test]
    fn face_api_error_outcome() {
        let mut f = fixture(&[true], unauthorized, true, None);
        match f.monitor.cycle().unwrap() {
            CycleOutcome::DetectionFailed(msg) => assert!(msg.contains("401")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn camera_failure_skips_detection() {
        let mut f = fixture(&[true], one_face, false, None);

        assert!(matches!(
            f.monitor.cycle().unwrap(),
            CycleOutcome::CaptureFailed(_)
        ));
        let calls = f.calls.borrow();
        assert_eq!(calls.captures, 1);
        assert_eq!(calls.detections, 0);
    }

    #[test]
    fn rejected_reports_are_counted_not_fatal() {
        fn rejected() -> AppError {
            AppError::Rejected {
                service: "kintone".into(),
                status: 500,
            }
        }
        let mut f = fixture(&[true], three_faces, true, Some(rejected));

        assert_eq!(
            f.monitor.cycle().unwrap(),
            CycleOutcome::Reported {
                faces: 3,
                delivered: 0,
                rejected: 3
            }
        );
    }

    #[test]
    fn fatal_sink_error_stops_the_run() {
        fn closed_input() -> AppError {
            AppError::Input("console input closed".into())
        }
        let mut f = fixture(&[true, false], one_face, true, Some(closed_input));
        let running = AtomicBool::new(true);

        assert!(matches!(
            f.monitor.run(&running, None),
            Err(AppError::Input(_))
        ));
    }

    #[test]
    fn prompt_write_failure_skips_the_reports() {
        fn broken_pipe() -> AppError {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdout closed",
            ))
        }
        let mut f = fixture_with_begin(&[true, false], three_faces, true, None, Some(broken_pipe));
        let running = AtomicBool::new(true);

        let summary = f.monitor.run(&running, Some(2)).unwrap();

        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.rejected, 3);
        let calls = f.calls.borrow();
        assert_eq!(calls.begins, 1);
        assert!(calls.reports.is_empty());
    }

    #[test]
    fn closed_console_input_in_begin_is_fatal() {
        fn closed_input() -> AppError {
            AppError::Input("console input closed".into())
        }
        let mut f = fixture_with_begin(&[true, false], one_face, true, None, Some(closed_input));
        let running = AtomicBool::new(true);

        assert!(matches!(
            f.monitor.run(&running, None),
            Err(AppError::Input(_))
        ));
        assert!(f.calls.borrow().reports.is_empty());
    }

    #[test]
    fn sensor_failure_is_fatal() {
        let mut f = fixture(&[], one_face, true, None);
        let running = AtomicBool::new(true);
        assert!(matches!(
            f.monitor.run(&running, None),
            Err(AppError::Gpio(_))
        ));
    }

    #[test]
    fn interrupt_releases_sensor_exactly_once() {
        let calls: Shared = Rc::new(RefCell::new(Calls::default()));
        let running = Arc::new(AtomicBool::new(true));

        let mut monitor = Monitor::new(
            Box::new(ScriptedSensor {
                levels: VecDeque::from(vec![false, false]),
                calls: calls.clone(),
                // Ctrl+C arrives while the pin is being read
                stop_after_read: Some(running.clone()),
            }),
            Box::new(FakeCamera {
                image: None,
                calls: calls.clone(),
            }),
            Box::new(FakeDetector {
                response: one_face,
                calls: calls.clone(),
            }),
            Box::new(RecordingSink {
                calls: calls.clone(),
                fail_with: None,
                begin_fails_with: None,
            }),
            Duration::from_secs(3600),
        );

        let summary = monitor.run(&running, None).unwrap();
        assert_eq!(summary.cycles, 1);
        assert_eq!(calls.borrow().sensor_drops, 0);

        drop(monitor);
        assert_eq!(calls.borrow().sensor_drops, 1);
    }

    #[test]
    fn journal_records_each_cycle() {
        let f = fixture(&[false, true], one_face, true, None);
        let mut monitor = f.monitor.with_journal(Journal::in_memory().unwrap());
        let running = AtomicBool::new(true);

        monitor.run(&running, Some(2)).unwrap();

        let ops: Vec<String> = monitor
            .journal
            .as_ref()
            .unwrap()
            .entries(None)
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec!["idle", "motion", "detect", "report", "stop"]);
    }
}
