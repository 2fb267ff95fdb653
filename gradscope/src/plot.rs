use std::{
    ffi::{OsStr, OsString},
    fmt, fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use base64::{engine::general_purpose, Engine as _};
use eyre::{ensure, eyre, Result, WrapErr};
use log::debug;

use crate::{
    dot::{get_dot_graph, DotOptions},
    graph::Variable,
};

/// Overrides the graphviz binary used by [`plot_dot_graph`]
pub const DOT_ENV: &str = "GRADSCOPE_DOT";

/// Overrides the directory the intermediate `.dot` file is written to
pub const HOME_ENV: &str = "GRADSCOPE_HOME";

/// Set by the evcxr kernel in the processes it runs
pub const NOTEBOOK_ENV: &str = "EVCXR_IS_RUNTIME";

/// Name of the intermediate DOT file inside the scratch directory
pub const SCRATCH_FILE: &str = "tmp_graph.dot";

/// Output format handed to graphviz as `-T<format>`, taken from the file extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFormat(String);

impl ImageFormat {
    /// # Errors
    /// If `path` has no (utf8) extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| {
                eyre!(
                    "cannot tell the image format of {}, expected a file extension such as .png or .svg",
                    path.display()
                )
            })?;
        Ok(Self(ext.to_ascii_lowercase()))
    }

    pub fn extension(&self) -> &str {
        &self.0
    }

    /// MIME type for notebook display, `None` for formats notebooks can't show
    pub fn mime_type(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    }

    fn is_text(&self) -> bool {
        self.0 == "svg"
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for [`plot_dot_graph`].
#[derive(Clone, Debug)]
pub struct PlotOptions {
    pub verbose: bool,
    /// Where the rendered image goes. The extension picks the format.
    pub to_file: PathBuf,
    pub dot_binary: OsString,
    /// Directory holding the intermediate `.dot` file
    pub scratch_dir: PathBuf,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            to_file: PathBuf::from("graph.png"),
            dot_binary: dot_binary_from(std::env::var_os(DOT_ENV)),
            scratch_dir: scratch_dir_from(
                std::env::var_os(HOME_ENV),
                std::env::var_os("HOME"),
            ),
        }
    }
}

impl PlotOptions {
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_to_file(mut self, to_file: impl Into<PathBuf>) -> Self {
        self.to_file = to_file.into();
        self
    }

    #[must_use]
    pub fn with_dot_binary(mut self, dot_binary: impl Into<OsString>) -> Self {
        self.dot_binary = dot_binary.into();
        self
    }

    #[must_use]
    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }
}

fn dot_binary_from(env: Option<OsString>) -> OsString {
    env.filter(|s| !s.is_empty())
        .unwrap_or_else(|| OsString::from("dot"))
}

fn scratch_dir_from(override_dir: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|s| !s.is_empty()) {
        return PathBuf::from(dir);
    }
    match home.filter(|s| !s.is_empty()) {
        Some(home) => Path::new(&home).join(".gradscope"),
        None => std::env::temp_dir().join("gradscope"),
    }
}

/// Whether `binary` runs as a graphviz executable.
pub fn graphviz_available(binary: impl AsRef<OsStr>) -> bool {
    Command::new(binary)
        .arg("-V")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Render the graph behind `output` to an image with graphviz.
///
/// The DOT text is written to [`SCRATCH_FILE`] in the scratch directory,
/// which is created if needed, then `dot` renders it to `options.to_file`.
///
/// # Errors
/// If `to_file` has no extension, the scratch file cannot be written, or
/// graphviz cannot be launched or fails.
pub fn plot_dot_graph<V: Variable>(output: &V, options: &PlotOptions) -> Result<RenderedGraph> {
    let format = ImageFormat::from_path(&options.to_file)?;
    let dot_graph = get_dot_graph(output, &DotOptions::default().with_verbose(options.verbose));

    fs::create_dir_all(&options.scratch_dir).wrap_err_with(|| {
        format!(
            "could not create scratch directory {}",
            options.scratch_dir.display()
        )
    })?;
    let graph_path = options.scratch_dir.join(SCRATCH_FILE);
    fs::write(&graph_path, dot_graph)
        .wrap_err_with(|| format!("could not write {}", graph_path.display()))?;

    debug!(
        "Running graphviz: {} {} -T{} -o {}",
        options.dot_binary.to_string_lossy(),
        graph_path.display(),
        format,
        options.to_file.display()
    );

    let result = Command::new(&options.dot_binary)
        .arg(&graph_path)
        .arg(format!("-T{format}"))
        .arg("-o")
        .arg(&options.to_file)
        .output()
        .wrap_err_with(|| {
            format!(
                "could not run graphviz `{}`, is it installed and on PATH?",
                options.dot_binary.to_string_lossy()
            )
        })?;

    ensure!(
        result.status.success(),
        "graphviz failed with {}: {}",
        result.status,
        String::from_utf8_lossy(&result.stderr).trim()
    );

    Ok(RenderedGraph {
        path: options.to_file.clone(),
        format,
    })
}

/// An image produced by [`plot_dot_graph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedGraph {
    pub path: PathBuf,
    pub format: ImageFormat,
}

impl RenderedGraph {
    /// Show the image inline when running inside an evcxr (Jupyter) notebook.
    ///
    /// Anywhere else, or if the image can't be shown, this does nothing.
    pub fn display(&self) {
        if std::env::var_os(NOTEBOOK_ENV).is_none() {
            return;
        }

        match self.notebook_payload() {
            Ok(Some(payload)) => print!("{payload}"),
            Ok(None) => debug!("no notebook display for {} images", self.format),
            Err(err) => debug!("skipping notebook display: {err:#}"),
        }
    }

    /// The evcxr rich output block for this image, `None` if the format has no MIME type.
    ///
    /// # Errors
    /// If the image cannot be read
    pub fn notebook_payload(&self) -> Result<Option<String>> {
        let mime = match self.format.mime_type() {
            Some(mime) => mime,
            None => return Ok(None),
        };

        let bytes = fs::read(&self.path)
            .wrap_err_with(|| format!("could not read {}", self.path.display()))?;
        let content = if self.format.is_text() {
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            general_purpose::STANDARD.encode(&bytes)
        };

        Ok(Some(format!(
            "EVCXR_BEGIN_CONTENT {mime}\n{content}\nEVCXR_END_CONTENT\n"
        )))
    }
}
