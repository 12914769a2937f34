use duet_codegen::{
    FragmentRenderer, GenerationConfig, GenerationUnit, InputSource, MemberContext, ModelBuilder,
    Result, UnitContext, UnitModel,
};

use crate::{Entry, ObjcRenderer, include::Loader};

/// The manifest front end: TOML in, Objective-C fragments out.
///
/// # Example
///
/// ```no_run
/// use duet_codegen::{Driver, GenerationConfig, OBJECTIVE_C};
/// use duet_manifest::{ManifestFrontend, substitutions};
///
/// let config = GenerationConfig::new("design/units.toml").with_prefix("ACME");
/// let driver = Driver::new(config, &OBJECTIVE_C, substitutions());
/// driver.run(&ManifestFrontend::new(), |result| {
///     if let Err(err) = result {
///         eprintln!("{err}");
///     }
/// });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestFrontend {
    renderer: ObjcRenderer,
}

impl ManifestFrontend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelBuilder for ManifestFrontend {
    type Member = Entry;

    fn build(
        &self,
        input: &InputSource,
        config: &GenerationConfig,
    ) -> Result<Vec<UnitModel<Entry>>> {
        Loader::new(config).load(input)
    }
}

impl FragmentRenderer<Entry> for ManifestFrontend {
    fn begin_unit(&self, unit: &UnitContext<'_, Entry>, out: &mut GenerationUnit) -> Result<()> {
        self.renderer.begin_unit(unit, out)
    }

    fn render_member(
        &self,
        unit: &UnitContext<'_, Entry>,
        member: &MemberContext<'_, Entry>,
        out: &mut GenerationUnit,
    ) -> Result<()> {
        self.renderer.render_member(unit, member, out)
    }

    fn finish_unit(&self, unit: &UnitContext<'_, Entry>, out: &mut GenerationUnit) -> Result<()> {
        self.renderer.finish_unit(unit, out)
    }
}
