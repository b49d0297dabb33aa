//! Configuration primitives and loader for formatcheck.
//!
//! The loader resolves `.formatcheck.toml` using the precedence stack
//! override flag → working directory → git root → built-in defaults.
//! Parsed settings are normalised into typed structures, including the
//! baseline option set every analysed document starts from, so downstream
//! crates never touch raw TOML.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use formatcheck_options::{
    default_options, find_by_convention_key, OptionDescriptor, OptionKey, OptionValue,
    ResolvedOptionSet, ValueType,
};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use thiserror::Error;

pub mod editorconfig;

pub use editorconfig::EditorConfigProvider;

const CONFIG_FILE_NAME: &str = ".formatcheck.toml";

/// Language assigned to files no mapping matches.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub project: ProjectSettings,
    pub languages: LanguageSettings,
    pub conventions: ConventionSettings,
    pub options: OptionSettings,
    pub report: ReportSettings,
    pub sources: ConfigSources,
}

/// Project-level settings that declare which files are checked.
#[derive(Clone, Debug)]
pub struct ProjectSettings {
    pub root: PathBuf,
    pub include: PatternList,
    pub exclude: PatternList,
}

impl ProjectSettings {
    /// Whether `relative` (relative to the project root) should be checked.
    pub fn is_included(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }
}

/// Mapping from file patterns to language names, most specific first.
#[derive(Clone, Debug, Default)]
pub struct LanguageSettings {
    pub mappings: Vec<LanguageMapping>,
}

impl LanguageSettings {
    /// Language of the file at `relative`, or [`FALLBACK_LANGUAGE`].
    pub fn language_for(&self, relative: &Path) -> &str {
        self.mappings
            .iter()
            .find(|mapping| mapping.matcher.is_match(relative))
            .map(|mapping| mapping.language.as_str())
            .unwrap_or(FALLBACK_LANGUAGE)
    }
}

/// One pattern-to-language association.
#[derive(Clone, Debug)]
pub struct LanguageMapping {
    pub language: String,
    pub pattern: Pattern,
    pub matcher: GlobMatcher,
    pub source: ConfigSource,
    specificity: PatternSpecificity,
}

/// Settings controlling where per-file conventions come from.
#[derive(Clone, Debug)]
pub struct ConventionSettings {
    pub editorconfig: bool,
}

/// Option values configured in `.formatcheck.toml`, already typed.
#[derive(Clone, Debug, Default)]
pub struct OptionSettings {
    pub overrides: Vec<OptionOverride>,
}

impl OptionSettings {
    /// Built-in defaults with every configured override applied.
    pub fn baseline(&self) -> ResolvedOptionSet {
        self.overrides
            .iter()
            .fold(default_options(), |set, entry| {
                set.with(entry.key.clone(), entry.value.clone())
            })
    }
}

/// Single configured option value with provenance.
#[derive(Clone, Debug)]
pub struct OptionOverride {
    pub key: OptionKey,
    pub value: OptionValue,
    pub source: ConfigSource,
}

/// Settings describing how findings affect the exit status.
#[derive(Clone, Debug)]
pub struct ReportSettings {
    pub severity: SeverityLevel,
}

/// Severity attached to every formatting finding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeverityLevel {
    Error,
    Warning,
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeverityLevel::Error => "error",
            SeverityLevel::Warning => "warning",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for SeverityLevel {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "error" => Ok(SeverityLevel::Error),
            "warning" => Ok(SeverityLevel::Warning),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct PatternSpecificity {
    segments: usize,
    literal_chars: usize,
}

/// Pattern plus compiled matcher helper.
#[derive(Clone, Debug)]
pub struct Pattern {
    original: String,
    glob: Glob,
}

impl Pattern {
    fn new(source: ConfigSource, value: String) -> Result<Self, ConfigValidationError> {
        match Glob::new(&value) {
            Ok(glob) => Ok(Pattern {
                original: value,
                glob,
            }),
            Err(err) => Err(ConfigValidationError::new(
                Some(source),
                format!("invalid glob pattern '{value}': {err}"),
            )),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    fn glob(&self) -> &Glob {
        &self.glob
    }
}

/// Ordered list of glob patterns with a combined matcher.
#[derive(Clone, Debug)]
pub struct PatternList {
    patterns: Vec<Pattern>,
    set: GlobSet,
}

impl Default for PatternList {
    fn default() -> Self {
        PatternList {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl PatternList {
    fn new(patterns: Vec<Pattern>) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            builder.add(pattern.glob.clone());
        }
        Ok(PatternList {
            set: builder.build()?,
            patterns,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let config = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(config.with_sources(ConfigSources {
            working_directory: working_dir,
            layers: source_layers,
        }))
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

const DEFAULT_LANGUAGES: &[(&str, &[&str])] = &[
    ("csharp", &["**/*.cs"]),
    ("javascript", &["**/*.js", "**/*.mjs", "**/*.cjs"]),
    ("markdown", &["**/*.md", "**/*.markdown"]),
    ("python", &["**/*.py"]),
    ("rust", &["**/*.rs"]),
    ("toml", &["**/*.toml"]),
    ("typescript", &["**/*.ts", "**/*.tsx"]),
];

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let project = ProjectPartial {
        root: Some(Located::new(PathBuf::from("."), source.clone())),
        include: Some(Located::new(vec!["**/*".into()], source.clone())),
        exclude: Some(Located::new(
            vec![
                "**/.git/**".into(),
                "**/target/**".into(),
                "**/node_modules/**".into(),
            ],
            source.clone(),
        )),
        ..ProjectPartial::default()
    };

    let languages = DEFAULT_LANGUAGES
        .iter()
        .map(|(language, patterns)| {
            let patterns = patterns.iter().map(|pattern| pattern.to_string()).collect();
            (language.to_string(), Located::new(patterns, source.clone()))
        })
        .collect();

    PartialConfig {
        project: Some(project),
        languages,
        conventions: Some(ConventionsPartial {
            editorconfig: Some(Located::new(true, source.clone())),
        }),
        options: OptionsPartial::default(),
        report: Some(ReportPartial {
            severity: Some(Located::new("error".into(), source)),
        }),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    project: Option<ProjectPartial>,
    languages: BTreeMap<String, Located<Vec<String>>>,
    conventions: Option<ConventionsPartial>,
    options: OptionsPartial,
    report: Option<ReportPartial>,
}

impl PartialConfig {
    fn merge(&mut self, mut other: PartialConfig) {
        if let Some(other_project) = other.project.take() {
            match &mut self.project {
                Some(project) => project.merge(other_project),
                None => self.project = Some(other_project),
            }
        }

        self.languages.append(&mut other.languages);

        if let Some(other_conventions) = other.conventions.take() {
            match &mut self.conventions {
                Some(conventions) => conventions.merge(other_conventions),
                None => self.conventions = Some(other_conventions),
            }
        }

        self.options.merge(other.options);

        if let Some(other_report) = other.report.take() {
            match &mut self.report {
                Some(report) => report.merge(other_report),
                None => self.report = Some(other_report),
            }
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let project_partial = self.project.unwrap_or_default();
        let project_root_loc = project_partial.root.unwrap_or_else(|| {
            Located::new(
                PathBuf::from("."),
                ConfigSource::default(PathBuf::from(".")),
            )
        });
        let project_root = resolve_path(&project_root_loc);
        let include = compile_pattern_list(
            project_partial.include.unwrap_or_default(),
            "project.include",
            &mut errors,
        );
        let exclude = compile_pattern_list(
            project_partial.exclude.unwrap_or_default(),
            "project.exclude",
            &mut errors,
        );

        let languages = finalize_languages(self.languages, &mut errors);

        let editorconfig = self
            .conventions
            .and_then(|conventions| conventions.editorconfig)
            .map(|located| located.value)
            .unwrap_or(true);

        let options = finalize_options(self.options, &mut errors);

        let severity = match self.report.and_then(|report| report.severity) {
            Some(located) => match located.value.parse::<SeverityLevel>() {
                Ok(level) => level,
                Err(_) => {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source.clone()),
                            format!(
                                "invalid severity '{}' (expected 'error' or 'warning')",
                                located.value
                            ),
                        )
                        .with_context("report.severity"),
                    );
                    SeverityLevel::Error
                }
            },
            None => SeverityLevel::Error,
        };

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            project: ProjectSettings {
                root: project_root,
                include,
                exclude,
            },
            languages,
            conventions: ConventionSettings { editorconfig },
            options,
            report: ReportSettings { severity },
        })
    }
}

#[derive(Clone, Debug, Default)]
struct ProjectPartial {
    root: Option<Located<PathBuf>>,
    include: Option<Located<Vec<String>>>,
    exclude: Option<Located<Vec<String>>>,
}

impl ProjectPartial {
    fn merge(&mut self, other: ProjectPartial) {
        if other.root.is_some() {
            self.root = other.root;
        }
        if other.include.is_some() {
            self.include = other.include;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct ConventionsPartial {
    editorconfig: Option<Located<bool>>,
}

impl ConventionsPartial {
    fn merge(&mut self, other: ConventionsPartial) {
        if other.editorconfig.is_some() {
            self.editorconfig = other.editorconfig;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct OptionsPartial {
    global: BTreeMap<String, Located<String>>,
    languages: BTreeMap<String, BTreeMap<String, Located<String>>>,
}

impl OptionsPartial {
    fn merge(&mut self, other: OptionsPartial) {
        self.global.extend(other.global);
        for (language, values) in other.languages {
            self.languages.entry(language).or_default().extend(values);
        }
    }
}

#[derive(Clone, Debug, Default)]
struct ReportPartial {
    severity: Option<Located<String>>,
}

impl ReportPartial {
    fn merge(&mut self, other: ReportPartial) {
        if other.severity.is_some() {
            self.severity = other.severity;
        }
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

impl Default for Located<Vec<String>> {
    fn default() -> Self {
        Located::new(Vec::new(), ConfigSource::default(PathBuf::from(".")))
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    let joined = if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    };
    joined.components().collect()
}

fn compile_patterns(
    located: Located<Vec<String>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for pattern in located.value {
        match Pattern::new(located.source.clone(), pattern) {
            Ok(compiled) => patterns.push(compiled),
            Err(err) => errors.push(err.with_context(context)),
        }
    }
    patterns
}

fn compile_pattern_list(
    located: Located<Vec<String>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> PatternList {
    let source = located.source.clone();
    let patterns = compile_patterns(located, context, errors);
    match PatternList::new(patterns) {
        Ok(list) => list,
        Err(err) => {
            errors.push(
                ConfigValidationError::new(Some(source), format!("failed to build matcher: {err}"))
                    .with_context(context),
            );
            PatternList::default()
        }
    }
}

fn finalize_languages(
    entries: BTreeMap<String, Located<Vec<String>>>,
    errors: &mut Vec<ConfigValidationError>,
) -> LanguageSettings {
    let mut mappings = Vec::new();
    for (language, located) in entries {
        if language.trim().is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    "language names cannot be empty".into(),
                )
                .with_context("languages"),
            );
            continue;
        }

        let source = located.source.clone();
        let context = format!("languages.{language}");
        for pattern in compile_patterns(located, &context, errors) {
            mappings.push(LanguageMapping {
                language: language.clone(),
                matcher: pattern.glob().compile_matcher(),
                specificity: pattern_specificity(&pattern),
                pattern,
                source: source.clone(),
            });
        }
    }

    mappings.sort_by(|a, b| {
        b.specificity
            .cmp(&a.specificity)
            .then_with(|| a.language.cmp(&b.language))
            .then_with(|| a.pattern.original().cmp(b.pattern.original()))
    });

    LanguageSettings { mappings }
}

fn pattern_specificity(pattern: &Pattern) -> PatternSpecificity {
    let text = pattern.original();
    let segments = text
        .split(&['/', '\\'][..])
        .filter(|segment| !segment.is_empty() && *segment != "**")
        .count();
    let literal_chars = text
        .chars()
        .filter(|ch| !matches!(ch, '*' | '?' | '[' | ']' | '{' | '}' | '!' | '/'))
        .count();
    PatternSpecificity {
        segments,
        literal_chars,
    }
}

fn finalize_options(
    partial: OptionsPartial,
    errors: &mut Vec<ConfigValidationError>,
) -> OptionSettings {
    let mut overrides = Vec::new();

    for (key, located) in partial.global {
        if let Some((name, value)) = parse_option(&key, &located, "options", errors) {
            overrides.push(OptionOverride {
                key: OptionKey::global(name),
                value,
                source: located.source,
            });
        }
    }

    for (language, values) in partial.languages {
        let context = format!("options.{language}");
        for (key, located) in values {
            let Some((name, value)) = parse_option(&key, &located, &context, errors) else {
                continue;
            };
            let per_language = find_by_convention_key(&key)
                .map(|descriptor| descriptor.is_per_language)
                .unwrap_or(false);
            if !per_language {
                errors.push(
                    ConfigValidationError::new(
                        Some(located.source.clone()),
                        format!("option '{key}' applies to every language and cannot be scoped"),
                    )
                    .with_context(context.clone()),
                );
                continue;
            }
            overrides.push(OptionOverride {
                key: OptionKey::for_language(name, language.clone()),
                value,
                source: located.source,
            });
        }
    }

    OptionSettings { overrides }
}

fn parse_option(
    key: &str,
    located: &Located<String>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Option<(&'static str, OptionValue)> {
    let Some(descriptor) = find_by_convention_key(key) else {
        errors.push(
            ConfigValidationError::new(
                Some(located.source.clone()),
                format!("unknown option '{key}'"),
            )
            .with_context(context),
        );
        return None;
    };

    match descriptor.parse(&located.value) {
        Some(value) => Some((descriptor.name, value)),
        None => {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    format!(
                        "invalid value '{}' for option '{key}' (expected {})",
                        located.value,
                        describe_expected(descriptor)
                    ),
                )
                .with_context(context),
            );
            None
        }
    }
}

fn describe_expected(descriptor: &OptionDescriptor) -> String {
    match descriptor.value_type {
        ValueType::Enum(literals) => literals.join(" | "),
        other => other.label().to_string(),
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    project: ProjectSettings,
    languages: LanguageSettings,
    conventions: ConventionSettings,
    options: OptionSettings,
    report: ReportSettings,
}

impl ResolvedConfig {
    fn with_sources(self, sources: ConfigSources) -> Config {
        Config {
            project: self.project,
            languages: self.languages,
            conventions: self.conventions,
            options: self.options,
            report: self.report,
            sources,
        }
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    project: Option<RawProject>,
    #[serde(default)]
    languages: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    conventions: Option<RawConventions>,
    #[serde(default)]
    options: BTreeMap<String, RawOptionEntry>,
    #[serde(default)]
    report: Option<RawReport>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let languages = self
            .languages
            .into_iter()
            .map(|(language, patterns)| (language, Located::new(patterns, source.clone())))
            .collect();

        let mut options = OptionsPartial::default();
        for (key, entry) in self.options {
            match entry {
                RawOptionEntry::Scalar(value) => {
                    options
                        .global
                        .insert(key, Located::new(value.into_string(), source.clone()));
                }
                RawOptionEntry::Language(values) => {
                    let scoped = values
                        .into_iter()
                        .map(|(name, value)| {
                            (name, Located::new(value.into_string(), source.clone()))
                        })
                        .collect();
                    options.languages.insert(key, scoped);
                }
            }
        }

        PartialConfig {
            project: self
                .project
                .map(|project| project.into_partial(source.clone())),
            languages,
            conventions: self.conventions.map(|conventions| ConventionsPartial {
                editorconfig: conventions
                    .editorconfig
                    .map(|value| Located::new(value, source.clone())),
            }),
            options,
            report: self.report.map(|report| ReportPartial {
                severity: report.severity.map(|value| Located::new(value, source)),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    include: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
}

impl RawProject {
    fn into_partial(self, source: ConfigSource) -> ProjectPartial {
        ProjectPartial {
            root: self.root.map(|value| Located::new(value, source.clone())),
            include: self
                .include
                .map(|value| Located::new(value, source.clone())),
            exclude: self.exclude.map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConventions {
    #[serde(default)]
    editorconfig: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReport {
    #[serde(default)]
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOptionEntry {
    Scalar(RawScalar),
    Language(BTreeMap<String, RawScalar>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl RawScalar {
    fn into_string(self) -> String {
        match self {
            RawScalar::Bool(value) => value.to_string(),
            RawScalar::Int(value) => value.to_string(),
            RawScalar::Text(value) => value,
        }
    }
}
