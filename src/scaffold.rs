use crate::assembler::{GenerateOptions, OutputAssembler};
use crate::composer::RouteComposer;
use crate::error::Result;
use crate::model::ApiSpec;
use crate::walker::{ResourceWalker, ScaffoldState};
use log::{debug, info};

/// The complete generation pipeline: walk the resource tree, then assemble the output.
///
/// A `Scaffold` holds no per-run state; each call to [`Scaffold::generate`] starts from
/// an empty fragment buffer and schema registry.
pub struct Scaffold {
    composer: RouteComposer,
    options: GenerateOptions,
}

impl Scaffold {
    pub fn new(options: GenerateOptions) -> Result<Self> {
        Ok(Self {
            composer: RouteComposer::new()?,
            options,
        })
    }

    /// Walks every resource of `spec` and returns the collected fragments and schemas.
    pub fn collect(&self, spec: &ApiSpec) -> Result<ScaffoldState> {
        let mut state = ScaffoldState::new();
        ResourceWalker::new(&self.composer).walk_all(&spec.resources, &mut state)?;

        info!(
            "Composed {} route fragments and {} schemas",
            state.fragments.len(),
            state.schemas.len()
        );
        debug!("Schemas: {:?}", state.schemas.names());

        Ok(state)
    }

    /// Generates the scaffold as output lines.
    pub fn generate(&self, spec: &ApiSpec) -> Result<Vec<String>> {
        let state = self.collect(spec)?;
        OutputAssembler::new(self.composer.templates(), self.options.clone()).assemble(state)
    }
}
