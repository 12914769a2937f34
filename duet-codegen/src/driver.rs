//! One generation run, from input file to completion callback.
//!
//! Stages run strictly in order on one thread:
//!
//! read input → build models → populate units → generate → write
//!
//! [`Driver::run`] reports the outcome through a callback that fires exactly
//! once, whichever stage fails (a panicking stage included).
//! [`Driver::spawn`] does the same on a worker thread so the caller can keep
//! going while the run proceeds.

use std::{
    any::Any,
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    thread::{self, JoinHandle},
};

use serde::Serialize;

use crate::{
    Engine, Error, FragmentRenderer, GenerationConfig, GenerationResult, InputSource,
    ModelBuilder, OutputWriter, Result, SubstitutionTable, TargetLanguage, WriteOutcome,
};

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    /// Canonical names of the generated units, in order
    pub units: Vec<String>,
    /// Every artifact path the run produced
    pub artifacts: Vec<PathBuf>,
    pub outcome: WriteOutcome,
}

/// Coordinates one run for one input file.
#[derive(Debug)]
pub struct Driver {
    config: GenerationConfig,
    language: &'static TargetLanguage,
    substitutions: SubstitutionTable,
}

impl Driver {
    pub fn new(
        config: GenerationConfig,
        language: &'static TargetLanguage,
        substitutions: SubstitutionTable,
    ) -> Self {
        Self {
            config,
            language,
            substitutions,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Read, build and generate without touching the output directory.
    pub fn generate<F>(&self, frontend: &F) -> Result<GenerationResult>
    where
        F: ModelBuilder + FragmentRenderer<<F as ModelBuilder>::Member>,
    {
        self.generate_staged(frontend, &Cell::new("read"))
    }

    /// Run every stage and hand the outcome to `on_complete`.
    pub fn run<F, C>(&self, frontend: &F, on_complete: C)
    where
        F: ModelBuilder + FragmentRenderer<<F as ModelBuilder>::Member>,
        C: FnOnce(Result<RunReport>),
    {
        let stage = Cell::new("read");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(frontend, &stage)));
        let result = outcome.unwrap_or_else(|payload| {
            Err(Box::new(Error::Panicked {
                stage: stage.get(),
                message: panic_message(payload.as_ref()),
            }))
        });

        match &result {
            Ok(report) => tracing::info!(
                input = %report.input.display(),
                units = report.units.len(),
                written = report.outcome.written.len(),
                unchanged = report.outcome.unchanged.len(),
                "run complete"
            ),
            Err(err) => tracing::error!(
                input = %self.config.input.display(),
                kind = err.kind(),
                "run failed: {}",
                err
            ),
        }

        on_complete(result);
    }

    /// Like [`Driver::run`], on a new thread. The returned handle joins once
    /// the callback has returned.
    pub fn spawn<F, C>(self, frontend: F, on_complete: C) -> JoinHandle<()>
    where
        F: ModelBuilder + FragmentRenderer<<F as ModelBuilder>::Member> + Send + 'static,
        C: FnOnce(Result<RunReport>) + Send + 'static,
    {
        thread::spawn(move || self.run(&frontend, on_complete))
    }

    fn generate_staged<F>(&self, frontend: &F, stage: &Cell<&'static str>) -> Result<GenerationResult>
    where
        F: ModelBuilder + FragmentRenderer<<F as ModelBuilder>::Member>,
    {
        stage.set("read");
        tracing::debug!(input = %self.config.input.display(), "reading input");
        let input = InputSource::read(&self.config.input)?;

        stage.set("build");
        let models = frontend.build(&input, &self.config)?;
        tracing::debug!(units = models.len(), "built unit models");

        let engine = Engine::new(self.language, &self.substitutions);

        stage.set("populate");
        let units = engine.populate(&models, frontend, &self.config)?;

        stage.set("generate");
        engine.generate(&units, &self.config)
    }

    fn execute<F>(&self, frontend: &F, stage: &Cell<&'static str>) -> Result<RunReport>
    where
        F: ModelBuilder + FragmentRenderer<<F as ModelBuilder>::Member>,
    {
        let result = self.generate_staged(frontend, stage)?;

        stage.set("write");
        let writer = OutputWriter::new(&self.config.output_dir);
        let outcome = writer.write(&result)?;

        Ok(RunReport {
            input: self.config.input.clone(),
            units: result.unit_names().map(str::to_string).collect(),
            artifacts: result
                .artifacts()
                .map(|a| writer.path_for(&a.file_name))
                .collect(),
            outcome,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::Path,
        sync::{Arc, Mutex, mpsc},
    };

    use super::*;
    use crate::{GenerationUnit, MemberContext, OBJECTIVE_C, UnitContext, UnitModel};

    /// Each non-empty line `unit: member, member` is one unit.
    struct LineFrontend {
        panic_in_render: bool,
    }

    impl ModelBuilder for LineFrontend {
        type Member = ();

        fn build(
            &self,
            input: &InputSource,
            _config: &GenerationConfig,
        ) -> Result<Vec<UnitModel<()>>> {
            let mut models = Vec::new();
            for line in input.content().lines().filter(|l| !l.trim().is_empty()) {
                let (unit, members) = line.split_once(':').ok_or_else(|| {
                    Error::invalid_input(input.path(), input.content(), "missing ':'", None)
                })?;
                let mut model = UnitModel::new(unit.trim());
                for member in members.split(',').map(str::trim).filter(|m| !m.is_empty()) {
                    model = model.with_member(member, ());
                }
                models.push(model);
            }
            Ok(models)
        }
    }

    impl FragmentRenderer<()> for LineFrontend {
        fn render_member(
            &self,
            _unit: &UnitContext<'_, ()>,
            member: &MemberContext<'_, ()>,
            out: &mut GenerationUnit,
        ) -> Result<()> {
            if self.panic_in_render {
                panic!("renderer exploded");
            }
            out.add_declaration_fragment(format!("+ (void){};", member.name));
            out.add_definition_fragment(format!("+ (void){} {{}}", member.name));
            Ok(())
        }
    }

    fn input(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("units.txt");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn capture(
        driver: &Driver,
        frontend: &LineFrontend,
    ) -> (usize, Option<Result<RunReport>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        driver.run(frontend, move |result| sink.lock().unwrap().push(result));
        let mut calls = calls.lock().unwrap();
        let count = calls.len();
        (count, calls.pop())
    }

    #[test]
    fn test_run_writes_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(input(dir.path(), "widget: spin\ngadget: open\n"))
            .with_prefix("ACME")
            .with_output_dir(dir.path().join("out"));
        let driver = Driver::new(config, &OBJECTIVE_C, SubstitutionTable::new());

        let (count, result) = capture(&driver, &LineFrontend { panic_in_render: false });
        assert_eq!(count, 1);

        let report = result.unwrap().unwrap();
        assert_eq!(report.units, vec!["ACMEWidget", "ACMEGadget"]);
        assert_eq!(report.outcome.written.len(), 4);
        assert!(dir.path().join("out/ACMEGadget.m").exists());
    }

    #[test]
    fn test_callback_fires_once_on_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(dir.path().join("missing.txt"))
            .with_output_dir(dir.path().join("out"));
        let driver = Driver::new(config, &OBJECTIVE_C, SubstitutionTable::new());

        let (count, result) = capture(&driver, &LineFrontend { panic_in_render: false });
        assert_eq!(count, 1);
        assert_eq!(result.unwrap().unwrap_err().kind(), "input-unreadable");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_callback_fires_once_on_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(input(dir.path(), "no separator\n"))
            .with_output_dir(dir.path().join("out"));
        let driver = Driver::new(config, &OBJECTIVE_C, SubstitutionTable::new());

        let (count, result) = capture(&driver, &LineFrontend { panic_in_render: false });
        assert_eq!(count, 1);
        assert_eq!(result.unwrap().unwrap_err().kind(), "invalid-input");
    }

    #[test]
    fn test_callback_fires_once_on_panic() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(input(dir.path(), "widget: spin\n"))
            .with_output_dir(dir.path().join("out"));
        let driver = Driver::new(config, &OBJECTIVE_C, SubstitutionTable::new());

        let (count, result) = capture(&driver, &LineFrontend { panic_in_render: true });
        assert_eq!(count, 1);
        match *result.unwrap().unwrap_err() {
            Error::Panicked { stage, message } => {
                assert_eq!(stage, "populate");
                assert_eq!(message, "renderer exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_duplicate_units_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(input(dir.path(), "widget: a\nWidget: b\n"))
            .with_output_dir(dir.path().join("out"));
        let driver = Driver::new(config, &OBJECTIVE_C, SubstitutionTable::new());

        let (_, result) = capture(&driver, &LineFrontend { panic_in_render: false });
        assert_eq!(result.unwrap().unwrap_err().kind(), "duplicate-unit-name");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_spawn_delivers_result() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(input(dir.path(), "widget: spin\n"))
            .with_output_dir(dir.path().join("out"))
            .with_skip_declaration(true);
        let driver = Driver::new(config, &OBJECTIVE_C, SubstitutionTable::new());

        let (tx, rx) = mpsc::channel();
        let handle = driver.spawn(LineFrontend { panic_in_render: false }, move |result| {
            tx.send(result).unwrap();
        });

        let report = rx.recv().unwrap().unwrap();
        handle.join().unwrap();
        assert_eq!(report.artifacts, vec![dir.path().join("out/Widget.m")]);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_generate_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(input(dir.path(), "widget: spin\n"))
            .with_output_dir(dir.path().join("out"));
        let driver = Driver::new(config, &OBJECTIVE_C, SubstitutionTable::new());

        let result = driver.generate(&LineFrontend { panic_in_render: false }).unwrap();
        assert!(result.artifact("Widget.h").is_some());
        assert!(!dir.path().join("out").exists());
    }
}
