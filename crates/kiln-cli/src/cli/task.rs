use clap::ValueEnum;
use kiln_pipeline::orchestrator::names;

/// Every task the CLI can run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Task {
    /// Production build: minified, concatenated bundles plus the pages
    Build,
    /// Development build: one output per source, unminified
    BuildDevelopment,
    BuildJavascript,
    BuildJavascriptDevelopment,
    BuildJavascriptProduction,
    BuildCss,
    BuildCssDevelopment,
    BuildCssProduction,
    BuildIndex,
    BuildPartials,
    /// Watch sources, rebuild, push live reload and serve the output
    Watch,
    /// Remove the distribution directory
    Clean,
    /// Serve the distribution directory over HTTP
    Serve,
    /// List the available tasks
    Help,
}

impl Task {
    /// The build target this task runs, if it is a build task.
    pub fn target(self) -> Option<&'static str> {
        let target = match self {
            Task::Build => names::BUILD,
            Task::BuildDevelopment => names::BUILD_DEVELOPMENT,
            Task::BuildJavascript => names::BUILD_JAVASCRIPT,
            Task::BuildJavascriptDevelopment => names::BUILD_JAVASCRIPT_DEVELOPMENT,
            Task::BuildJavascriptProduction => names::BUILD_JAVASCRIPT_PRODUCTION,
            Task::BuildCss => names::BUILD_CSS,
            Task::BuildCssDevelopment => names::BUILD_CSS_DEVELOPMENT,
            Task::BuildCssProduction => names::BUILD_CSS_PRODUCTION,
            Task::BuildIndex => names::BUILD_INDEX,
            Task::BuildPartials => names::BUILD_PARTIALS,
            Task::Watch | Task::Clean | Task::Serve | Task::Help => return None,
        };
        Some(target)
    }

    /// The name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Task::Build => "build",
            Task::BuildDevelopment => "build-development",
            Task::BuildJavascript => "build-javascript",
            Task::BuildJavascriptDevelopment => "build-javascript-development",
            Task::BuildJavascriptProduction => "build-javascript-production",
            Task::BuildCss => "build-css",
            Task::BuildCssDevelopment => "build-css-development",
            Task::BuildCssProduction => "build-css-production",
            Task::BuildIndex => "build-index",
            Task::BuildPartials => "build-partials",
            Task::Watch => "watch",
            Task::Clean => "clean",
            Task::Serve => "serve",
            Task::Help => "help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Task::Build => "Minify and bundle scripts and styles, copy the pages",
            Task::BuildDevelopment => "Copy scripts, compile styles, copy the pages",
            Task::BuildJavascript => "Run both script builds",
            Task::BuildJavascriptDevelopment => "Copy scripts into dist/javascript",
            Task::BuildJavascriptProduction => "Minify and concatenate scripts into one bundle",
            Task::BuildCss => "Run both style builds",
            Task::BuildCssDevelopment => "Compile styles into dist/css, one file per source",
            Task::BuildCssProduction => "Compile, minify and concatenate styles into one bundle",
            Task::BuildIndex => "Copy the pages into dist",
            Task::BuildPartials => "Copy the partials into dist/partials",
            Task::Watch => "Rebuild on change, push live reload and serve dist",
            Task::Clean => "Remove the distribution directory",
            Task::Serve => "Serve the distribution directory over HTTP",
            Task::Help => "List the available tasks",
        }
    }

    /// Main tasks are listed first by `help`; the rest are building blocks.
    pub fn is_main(self) -> bool {
        matches!(
            self,
            Task::Build | Task::BuildDevelopment | Task::Watch | Task::Clean | Task::Serve | Task::Help
        )
    }

    pub fn all() -> &'static [Task] {
        Task::value_variants()
    }
}
