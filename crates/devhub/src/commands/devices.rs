//! Device command handlers.

use std::collections::HashSet;

use tabled::Tabled;

use devhub_core::transform;
use devhub_core::{
    ConfigEntry, ConfigValue, DeleteConfirmation, Device, DeviceConfig, DeviceDraft, DeviceId,
    DeviceRegistry, DeviceType,
};

use crate::cli::{CreateArgs, DevicesArgs, DevicesCommand, EditArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Config")]
    config: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            device_type: d.device_type.label().to_owned(),
            config: config_summary(&d.config, color),
        }
    }
}

/// `key=value, key=value`, or `-` for an empty configuration.
fn config_summary(config: &DeviceConfig, color: bool) -> String {
    if config.is_empty() {
        return "-".into();
    }
    config
        .iter()
        .map(|(k, v)| format!("{k}={}", output::config_value(v, color)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail(d: &Device, color: bool) -> String {
    let mut lines = vec![
        format!("ID:     {}", d.id),
        format!("Name:   {}", d.name),
        format!("Type:   {}", d.device_type.label()),
    ];
    if d.config.is_empty() {
        lines.push("Config: -".into());
    } else {
        lines.push("Config:".into());
        let width = d.config.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in &d.config {
            lines.push(format!(
                "  {key:<width$}  {}",
                output::config_value(value, color)
            ));
        }
    }
    lines.join("\n")
}

fn print_device(device: &Device, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        device,
        |d| detail(d, color),
        |d| d.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Input validation ────────────────────────────────────────────────

/// Parse one `KEY=VALUE` argument. A missing `=` or an empty value
/// yields an entry without a value, which [`validate_entries`] rejects.
fn parse_assignment(raw: &str) -> ConfigEntry {
    match raw.split_once('=') {
        Some((key, "")) => ConfigEntry::blank(key.trim()),
        Some((key, value)) => ConfigEntry {
            key: key.trim().to_owned(),
            value: Some(ConfigValue::parse(value)),
        },
        None => ConfigEntry::blank(raw.trim()),
    }
}

/// Every key non-empty, every value present, keys unique.
fn validate_entries(entries: &[ConfigEntry]) -> Result<(), CliError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.key.is_empty() {
            return Err(CliError::Validation {
                field: "config".into(),
                reason: "every entry needs a key".into(),
            });
        }
        if entry.value.is_none() {
            return Err(CliError::Validation {
                field: "config".into(),
                reason: format!("entry '{}' needs a value (use KEY=VALUE)", entry.key),
            });
        }
        if !seen.insert(entry.key.as_str()) {
            return Err(CliError::Validation {
                field: "config".into(),
                reason: format!("key '{}' is given more than once", entry.key),
            });
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: "device name cannot be empty".into(),
        });
    }
    Ok(())
}

/// Parse and validate `--set` arguments as a group.
fn assignments(raw: &[String]) -> Result<Vec<ConfigEntry>, CliError> {
    let entries: Vec<ConfigEntry> = raw.iter().map(String::as_str).map(parse_assignment).collect();
    validate_entries(&entries)?;
    Ok(entries)
}

/// Overlay validated assignments onto `entries`.
fn apply_assignments(entries: &mut Vec<ConfigEntry>, assigned: Vec<ConfigEntry>) {
    for entry in assigned {
        if let Some(value) = entry.value {
            transform::set_entry(entries, &entry.key, value);
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    registry: &DeviceRegistry,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => list(registry, global).await,

        DevicesCommand::Get { id } => {
            let device = registry.get(&DeviceId::from(id)).await?;
            print_device(&device, global);
            Ok(())
        }

        DevicesCommand::Create(args) => create(registry, args, global).await,
        DevicesCommand::Edit(args) => edit(registry, args, global).await,
        DevicesCommand::Delete { id } => delete(registry, DeviceId::from(id), global).await,
    }
}

async fn list(registry: &DeviceRegistry, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = util::spinner("Loading devices...", global.quiet);
    let result = registry.load_all().await;
    spinner.finish_and_clear();
    let devices = result?;

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &devices,
        |d| DeviceRow::new(d, color),
        |d| d.id.to_string(),
    );
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        let loaded = registry.last_reload().map_or_else(String::new, |t| {
            format!(", loaded at {}", t.with_timezone(&chrono::Local).format("%H:%M:%S"))
        });
        eprintln!("{} device(s){loaded}", devices.len());
    }
    Ok(())
}

async fn create(
    registry: &DeviceRegistry,
    args: CreateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut draft = match args.from_file {
        Some(path) => serde_json::from_value::<DeviceDraft>(util::read_json_file(&path)?)?,
        None => {
            let device_type = args
                .device_type
                .map(DeviceType::from)
                .ok_or_else(|| CliError::Validation {
                    field: "type".into(),
                    reason: "a device type is required".into(),
                })?;
            DeviceDraft::new(args.name.unwrap_or_default(), device_type)
        }
    };
    validate_name(&draft.name)?;

    let mut entries = transform::to_entries(&draft.config);
    apply_assignments(&mut entries, assignments(&args.set)?);
    validate_entries(&entries)?;
    draft.config = transform::to_mapping(&entries);

    let spinner = util::spinner("Creating device...", global.quiet);
    let result = registry.create(&draft).await;
    if result.is_ok() {
        registry.settled().await;
    }
    spinner.finish_and_clear();
    let created = result?;

    let shown = registry
        .device(&created.id)
        .map_or(created, |d| Device::clone(&d));
    if !global.quiet {
        eprintln!("✓ Created device {} ({})", shown.name, shown.id);
    }
    print_device(&shown, global);
    Ok(())
}

async fn edit(registry: &DeviceRegistry, args: EditArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let assigned = assignments(&args.set)?;
    if assigned.is_empty() && args.unset.is_empty() && !args.clear {
        return Err(CliError::Validation {
            field: "edit".into(),
            reason: "nothing to change (use --set, --unset or --clear)".into(),
        });
    }

    let current = registry.get(&DeviceId::from(args.id)).await?;
    let mut entries = if args.clear {
        Vec::new()
    } else {
        transform::to_entries(&current.config)
    };
    for key in &args.unset {
        if !transform::remove_entry(&mut entries, key) && !args.clear {
            return Err(CliError::Validation {
                field: "unset".into(),
                reason: format!("device {} has no configuration entry '{key}'", current.id),
            });
        }
    }
    apply_assignments(&mut entries, assigned);
    validate_entries(&entries)?;

    // Name and type are carried over unchanged.
    let draft = DeviceDraft::from(&current).with_config(transform::to_mapping(&entries));

    let spinner = util::spinner("Saving device...", global.quiet);
    let result = registry.update(&current.id, &draft).await;
    if result.is_ok() {
        registry.settled().await;
    }
    spinner.finish_and_clear();
    let updated = result?;

    let shown = registry
        .device(&current.id)
        .map_or(updated, |d| Device::clone(&d));
    if !global.quiet {
        eprintln!("✓ Updated device {} ({})", shown.name, shown.id);
    }
    print_device(&shown, global);
    Ok(())
}

async fn delete(registry: &DeviceRegistry, id: DeviceId, global: &GlobalOpts) -> Result<(), CliError> {
    util::ensure_can_confirm("devices delete", global.yes)?;

    let device = registry.get(&id).await?;
    let mut confirmation = DeleteConfirmation::new();
    confirmation.request(device.id.clone())?;

    let prompt = format!(
        "Delete {} '{}' ({})?",
        device.device_type.label(),
        device.name,
        device.id
    );
    if !util::confirm(&prompt, global.yes)? {
        confirmation.cancel();
        if !global.quiet {
            eprintln!("Cancelled; device {} was not deleted", device.id);
        }
        return Ok(());
    }

    let spinner = util::spinner("Deleting device...", global.quiet);
    let result = confirmation.confirm(registry).await;
    if result.is_ok() {
        registry.settled().await;
    }
    spinner.finish_and_clear();
    let deleted = result?;

    if !global.quiet {
        eprintln!("✓ Deleted device {} ({deleted})", device.name);
    }
    Ok(())
}
