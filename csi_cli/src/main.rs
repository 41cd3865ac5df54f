//! # csi_cli
//!
//! Command-line driver for `csi_core`:
//!
//! - `demo` builds a small model through the typed accessors on the
//!   in-process engine and reports what it defined
//! - `inspect` summarizes a saved model snapshot
//! - `versions` prints the engine capability table

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use serde::Serialize;

use csi_core::accessors::Definitions;
use csi_core::config::SessionConfig;
use csi_core::engine::model::ModelData;
use csi_core::engine::{EngineVersion, EntryPoint, Interface, Program};
use csi_core::enums::{LinkAxialDirection, MaterialType, SpringNonlinearity};
use csi_core::file_io::{load_model_with_lock_check, LockInfo};
use csi_core::session::Session;
use csi_core::values::{
    AreaSpringProperties, CableProperties, DefinitionInfo, EndReleases, FrameModifier, ISection, JointLink,
    LinearLinkProperties, ShellProperties,
};

#[derive(Parser)]
#[command(name = "csi_cli")]
#[command(about = "Typed access to SAP2000/ETABS models", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a demonstration model on the in-process engine
    Demo {
        /// Engine build, e.g. sap2000-v19 or etabs-2016
        #[arg(short, long)]
        engine: Option<String>,

        /// Session configuration file (JSON)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        config: Option<PathBuf>,

        /// Save the resulting model snapshot here
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        save: Option<PathBuf>,

        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Summarize a saved model snapshot
    Inspect {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,

        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List known engine builds and what they expose
    Versions {
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

/// Definition counts of one model
#[derive(Debug, Serialize)]
struct ModelSummary {
    program: Program,
    units: String,
    locked: bool,
    materials: Vec<String>,
    frame_sections: Vec<String>,
    area_sections: Vec<String>,
    cable_sections: Vec<String>,
    area_springs: Vec<String>,
    point_springs: Vec<String>,
    links: Vec<String>,
    frames: Vec<String>,
    areas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locked_by: Option<LockInfo>,
}

impl ModelSummary {
    fn from_model(model: &ModelData, locked_by: Option<LockInfo>) -> Self {
        ModelSummary {
            program: model.meta.program,
            units: model.units.label().to_string(),
            locked: model.locked,
            materials: model.materials.names(),
            frame_sections: model.frame_sections.names(),
            area_sections: model.area_sections.names(),
            cable_sections: model.cable_sections.names(),
            area_springs: model.area_springs.names(),
            point_springs: model.point_springs.names(),
            links: model.links.names(),
            frames: model.frames.names(),
            areas: model.areas.names(),
            locked_by,
        }
    }

    fn print_text(&self) {
        println!("Program:  {}", self.program);
        println!("Units:    {}", self.units);
        println!("Locked:   {}", if self.locked { "yes" } else { "no" });
        if let Some(holder) = &self.locked_by {
            println!(
                "In use:   {} on {} since {}",
                holder.user_id,
                holder.machine,
                holder.locked_at.to_rfc3339()
            );
        }
        println!();
        let tables = [
            ("Materials", &self.materials),
            ("Frame sections", &self.frame_sections),
            ("Area sections", &self.area_sections),
            ("Cable sections", &self.cable_sections),
            ("Area springs", &self.area_springs),
            ("Point springs", &self.point_springs),
            ("Links", &self.links),
            ("Frames", &self.frames),
            ("Areas", &self.areas),
        ];
        for (title, names) in tables {
            if names.is_empty() {
                continue;
            }
            println!("{:<16}{:>3}  {}", title, names.len(), names.join(", "));
        }
    }
}

/// One row of the `versions` table
#[derive(Debug, Serialize)]
struct VersionRow {
    id: &'static str,
    label: String,
    interfaces: Vec<&'static str>,
    single_joint_links: bool,
    nonprismatic_sections: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Demo {
            engine,
            config,
            save,
            format,
        } => demo(engine.as_deref(), config.as_deref(), save.as_deref(), format),
        Commands::Inspect { path, format } => inspect(&path, format),
        Commands::Versions { format } => versions(format),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn demo(engine: Option<&str>, config: Option<&Path>, save: Option<&Path>, format: OutputFormat) -> Result<()> {
    let mut config = match config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("failed to read session config {}", path.display()))?,
        None => SessionConfig::default(),
    }
    .with_env_overrides()
    .context("invalid environment override")?;
    if let Some(id) = engine {
        config.version = id.parse().with_context(|| format!("unknown engine '{}'", id))?;
    }
    // the demo always starts from a blank model
    config.model_path = None;

    let session = Session::in_memory(config).context("failed to start session")?;
    build_demo_model(&session).context("failed to build demo model")?;

    if let Some(path) = save {
        session
            .file()
            .save(path)
            .with_context(|| format!("failed to save model to {}", path.display()))?;
        log::info!("model saved to {}", path.display());
    }

    let summary = summarize(&session)?;
    match format {
        OutputFormat::Text => {
            println!("Demo model on {}", session.version());
            println!();
            summary.print_text();
            Ok(())
        }
        OutputFormat::Json => print_json(&summary),
    }
}

/// A two-bay portal with a slab, exercising every accessor the build offers
fn build_demo_model(session: &Session) -> Result<()> {
    let version = session.version();
    let materials = session.materials();
    let steel = materials.add_material(MaterialType::Steel, "United States", "ASTM A992", "Grade 50", "")?;
    let concrete = materials.add_material(MaterialType::Concrete, "United States", "Customary", "f'c 4000 psi", "")?;

    let sections = session.frame_sections();
    sections.set_i_section("W14X90", &ISection::symmetric(steel.as_str(), 14.0, 14.5, 0.71, 0.44))?;
    sections.set_i_section("W18X35", &ISection::symmetric(steel.as_str(), 17.7, 6.0, 0.425, 0.3))?;
    session
        .area_sections()
        .set_shell("Slab8", &ShellProperties::thin(concrete.as_str(), 8.0))?;

    let frames = session.frame_objects();
    let columns = [
        frames.add_by_coord([0.0, 0.0, 0.0], [0.0, 0.0, 144.0], "W14X90", "C1")?,
        frames.add_by_coord([288.0, 0.0, 0.0], [288.0, 0.0, 144.0], "W14X90", "C2")?,
        frames.add_by_coord([576.0, 0.0, 0.0], [576.0, 0.0, 144.0], "W14X90", "C3")?,
    ];
    let beams = [
        frames.add_by_coord([0.0, 0.0, 144.0], [288.0, 0.0, 144.0], "W18X35", "F1")?,
        frames.add_by_coord([288.0, 0.0, 144.0], [576.0, 0.0, 144.0], "W18X35", "F2")?,
    ];
    log::debug!("columns {:?}, beams {:?}", columns, beams);

    let modifiers = FrameModifier::from_array(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.001])?;
    for beam in &beams {
        session.frame_modifiers().set_modifiers(beam, &modifiers, Default::default())?;
        session.frame_releases().set_releases(beam, &EndReleases::pinned(), Default::default())?;
    }

    session.area_objects().add_by_coord(
        &[0.0, 576.0, 576.0, 0.0],
        &[0.0, 0.0, 240.0, 240.0],
        &[144.0; 4],
        "Slab8",
        "S1",
    )?;

    let mut pile = LinearLinkProperties::axial(250.0);
    pile.notes = "pile head".to_string();
    session.links().set_linear("PileHead", &pile)?;

    if version.supports_interface(Interface::PropCable) {
        let strand = materials.add_material(MaterialType::Tendon, "United States", "ASTM A416", "Grade 270", "")?;
        session
            .cable_sections()
            .set_properties("Strand", &CableProperties::from_diameter(strand.as_str(), 0.6)?)?;
    }

    if version.supports_interface(Interface::PropAreaSpring) {
        session.area_springs().set_properties(
            "Subgrade",
            &AreaSpringProperties::user_defined(0.0, 0.0, 0.15, SpringNonlinearity::CompressionOnly),
        )?;
    }

    if version.supports(EntryPoint::new(Interface::PropPointSpring, "SetSingleJointLinks")) {
        let links = [
            JointLink::new("PileHead", LinkAxialDirection::NegativeZ, 0.0),
            JointLink::new("PileHead", LinkAxialDirection::PositiveX, 90.0),
        ];
        session
            .point_springs()
            .set_joint_links("PileGroup", &links, &DefinitionInfo::with_notes("two-pile cap"))?;
    }

    Ok(())
}

/// Read the model back through the accessors
fn summarize(session: &Session) -> Result<ModelSummary> {
    let version = session.version();
    let optional = |interface: Interface, list: &dyn Fn() -> csi_core::ApiResult<Vec<String>>| {
        if version.supports_interface(interface) {
            list()
        } else {
            Ok(Vec::new())
        }
    };
    Ok(ModelSummary {
        program: version.program(),
        units: session.sap_model().present_units()?.label().to_string(),
        locked: session.sap_model().is_locked()?,
        materials: session.materials().name_list()?,
        frame_sections: session.frame_sections().name_list()?,
        area_sections: session.area_sections().name_list()?,
        cable_sections: optional(Interface::PropCable, &|| session.cable_sections().name_list())?,
        area_springs: optional(Interface::PropAreaSpring, &|| session.area_springs().name_list())?,
        point_springs: optional(Interface::PropPointSpring, &|| session.point_springs().name_list())?,
        links: session.links().name_list()?,
        frames: session.frame_objects().name_list()?,
        areas: session.area_objects().name_list()?,
        locked_by: None,
    })
}

fn inspect(path: &Path, format: OutputFormat) -> Result<()> {
    if !path.exists() {
        bail!("no model snapshot at {}", path.display());
    }
    let (model, holder) =
        load_model_with_lock_check(path).with_context(|| format!("failed to load {}", path.display()))?;
    let summary = ModelSummary::from_model(&model, holder);
    match format {
        OutputFormat::Text => {
            println!("{}", path.display());
            println!("Schema {} / modified {}", model.meta.version, model.meta.modified.to_rfc3339());
            println!();
            summary.print_text();
            Ok(())
        }
        OutputFormat::Json => print_json(&summary),
    }
}

fn versions(format: OutputFormat) -> Result<()> {
    let rows: Vec<VersionRow> = EngineVersion::ALL
        .iter()
        .map(|v| VersionRow {
            id: v.id(),
            label: v.label(),
            interfaces: v.interfaces().iter().map(|i| i.name()).collect(),
            single_joint_links: v.supports(EntryPoint::new(Interface::PropPointSpring, "SetSingleJointLinks")),
            nonprismatic_sections: v.supports(EntryPoint::new(Interface::PropFrame, "SetNonPrismatic")),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Text => {
            println!("{:<14}{:<14}{:<8}{:<8}", "ID", "LABEL", "JLINKS", "NONPRIS");
            for row in &rows {
                let flag = |b: bool| if b { "yes" } else { "-" };
                println!(
                    "{:<14}{:<14}{:<8}{:<8}",
                    row.id,
                    row.label,
                    flag(row.single_joint_links),
                    flag(row.nonprismatic_sections)
                );
            }
            println!();
            for interface in Interface::ALL {
                let ids: Vec<&str> = rows
                    .iter()
                    .filter(|r| r.interfaces.contains(&interface.name()))
                    .map(|r| r.id)
                    .collect();
                println!("{:<16}{}", interface.name(), ids.join(" "));
            }
            Ok(())
        }
    }
}
