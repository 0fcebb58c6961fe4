use dct_core::config::RemoteConfig;
use dct_core::util::is_http_url;

use crate::cli::ConfigCommands;
use crate::config_profiles::{normalize_text_option, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            supabase_url,
            supabase_anon_key,
            table,
            no_activate,
        } => run_config_init(
            global_profile,
            supabase_url,
            supabase_anon_key,
            table,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn run_config_init(
    profile_name: Option<&str>,
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    table: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    apply_profile_values(
        &mut config,
        &profile_name,
        supabase_url,
        supabase_anon_key,
        table,
        RemoteConfig::from_env(),
    )?;
    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Saved profile '{profile_name}' to {}", path.display());

    let resolved = config
        .profile(&profile_name)
        .map(|profile| profile.remote_config())
        .unwrap_or_default();
    if !resolved.is_configured() {
        println!("Remote store is not configured for this profile; bookings stay local.");
    }
    Ok(())
}

/// Merge explicit flags, then the `DCT_*` env layer, over the stored profile.
pub fn apply_profile_values(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    table: Option<String>,
    from_env: RemoteConfig,
) -> Result<(), CliError> {
    let supabase_url = normalize_text_option(supabase_url)
        .or(from_env.supabase_url)
        .map(normalize_supabase_url)
        .transpose()?;
    let supabase_anon_key = normalize_text_option(supabase_anon_key).or(from_env.supabase_anon_key);
    let table = normalize_text_option(table).or(from_env.table);

    let profile = config.profile_mut_or_default(profile_name);
    if supabase_url.is_some() {
        profile.supabase_url = supabase_url;
    }
    if supabase_anon_key.is_some() {
        profile.supabase_anon_key = supabase_anon_key;
    }
    if table.is_some() {
        profile.table = table;
    }
    Ok(())
}

pub fn normalize_supabase_url(value: String) -> Result<String, CliError> {
    let normalized = value.trim().trim_end_matches('/').to_string();
    if is_http_url(&normalized) {
        Ok(normalized)
    } else {
        Err(CliError::Config(format!(
            "Supabase URL must start with http:// or https://, got '{value}'"
        )))
    }
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let base = config
        .profile(&profile_name)
        .map(|profile| profile.remote_config())
        .unwrap_or_default();
    let resolved = RemoteConfig::from_env().merged_over(base);

    for line in describe_remote_config(&profile_name, &resolved) {
        println!("{line}");
    }
    Ok(())
}

pub fn describe_remote_config(profile_name: &str, config: &RemoteConfig) -> Vec<String> {
    vec![
        format!("profile: {profile_name}"),
        format!(
            "supabase_url: {}",
            config.supabase_url.as_deref().unwrap_or("(unset)")
        ),
        format!(
            "supabase_anon_key: {}",
            config
                .supabase_anon_key
                .as_deref()
                .map_or("(unset)", |_| "[REDACTED]")
        ),
        format!("table: {}", config.table_name()),
        format!("timeout: {}s", config.timeout().as_secs()),
        format!("configured: {}", config.is_configured()),
    ]
}
