//! Activity type command implementations

use crate::cli::{self, ActivityTypeCommands, ScopeArgs};
use crate::commands::{read_input, with_ctrl_c};
use crate::connection::{ConnectionManager, Target};
use crate::error::{AdfCtlError, Result as CliResult};
use crate::output::{self, OutputFormat};
use datafactory_core::config::ResolvedProfile;
use datafactory_core::{
    ActivityType, ActivityTypeCreateOrUpdateParameters, ActivityTypeCreateOrUpdateResponse,
    ActivityTypeCreateOrUpdateWithRawJsonContentParameters, ActivityTypeGetParameters,
    ActivityTypeListParameters, ActivityTypeOperations, DataFactoryClient,
    LongRunningOperationResponse, OperationStatus, ProgressCallback, ProgressEvent, list_all,
    poll_until_complete,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Flattened view used for table output
#[derive(Debug, Serialize)]
struct ActivityTypeRow<'a> {
    name: &'a str,
    scope: Option<&'a str>,
    #[serde(rename = "baseType")]
    base_type: Option<&'a str>,
    state: Option<&'a str>,
}

impl<'a> From<&'a ActivityType> for ActivityTypeRow<'a> {
    fn from(activity: &'a ActivityType) -> Self {
        Self {
            name: &activity.name,
            scope: activity.properties.scope.as_deref(),
            base_type: activity.properties.base_type.as_deref(),
            state: activity.properties.provisioning_state.as_deref(),
        }
    }
}

/// Shared per-invocation context
struct CommandContext<'a> {
    conn_mgr: &'a ConnectionManager,
    profile_name: Option<&'a str>,
    output: cli::OutputFormat,
    query: Option<&'a str>,
}

impl CommandContext<'_> {
    fn connect(&self) -> CliResult<(DataFactoryClient, ResolvedProfile)> {
        let profile = self.conn_mgr.resolve_profile(self.profile_name)?;
        let client = self.conn_mgr.create_client(&profile)?;
        Ok((client, profile))
    }

    fn connect_to(
        &self,
        args: &ScopeArgs,
    ) -> CliResult<(DataFactoryClient, ResolvedProfile, Target)> {
        let (client, profile) = self.connect()?;
        let target = self.conn_mgr.resolve_target(args, &profile)?;
        Ok((client, profile, target))
    }

    fn format(&self, fallback: OutputFormat) -> OutputFormat {
        OutputFormat::resolve(self.output, self.query, fallback)
    }

    /// Explicit table output without a query renders summary rows
    fn wants_rows(&self, format: OutputFormat) -> bool {
        format == OutputFormat::Table && self.query.is_none()
    }

    fn print<T: Serialize>(&self, data: T, format: OutputFormat) -> CliResult<()> {
        output::print_result(data, format, self.query)
    }
}

/// Handle activity type commands
pub async fn handle_activity_type_command(
    cmd: &ActivityTypeCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output: cli::OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let ctx = CommandContext {
        conn_mgr,
        profile_name,
        output,
        query,
    };

    match cmd {
        ActivityTypeCommands::Get {
            name,
            scope,
            target,
        } => handle_get(&ctx, name, scope.as_deref(), target).await,
        ActivityTypeCommands::List {
            name,
            scope,
            all_versions,
            all,
            next_link,
            target,
        } => {
            let mut params = ActivityTypeListParameters::new().with_all_versions(*all_versions);
            if let Some(name) = name {
                params = params.with_activity_type_name(name);
            }
            if let Some(scope) = scope {
                params = params.with_registration_scope(scope);
            }
            handle_list(&ctx, &params, *all, next_link.as_deref(), target).await
        }
        ActivityTypeCommands::Create { file, target } => handle_create(&ctx, file, target).await,
        ActivityTypeCommands::CreateRaw {
            name,
            file,
            data,
            target,
        } => {
            let content = match (data, file) {
                (Some(data), _) => data.clone(),
                (None, Some(file)) => read_input(file)?,
                (None, None) => {
                    return Err(AdfCtlError::InvalidInput {
                        message: "either --file or --data is required".to_string(),
                    });
                }
            };
            handle_create_raw(&ctx, name, content, target).await
        }
        ActivityTypeCommands::Delete {
            name,
            no_wait,
            wait_timeout,
            wait_interval,
            target,
        } => handle_delete(&ctx, name, *no_wait, *wait_timeout, *wait_interval, target).await,
    }
}

async fn handle_get(
    ctx: &CommandContext<'_>,
    name: &str,
    scope: Option<&str>,
    args: &ScopeArgs,
) -> CliResult<()> {
    let (client, _, target) = ctx.connect_to(args)?;

    let mut params = ActivityTypeGetParameters::new(name);
    if let Some(scope) = scope {
        params = params.with_registration_scope(scope);
    }

    debug!("Getting activity type {}", name);
    let response =
        with_ctrl_c(client.get(&target.resource_group, &target.data_factory, &params)).await?;

    let format = ctx.format(OutputFormat::Json);
    ctx.print(&response.activity_type, format)
}

async fn handle_list(
    ctx: &CommandContext<'_>,
    params: &ActivityTypeListParameters,
    all: bool,
    next_link: Option<&str>,
    args: &ScopeArgs,
) -> CliResult<()> {
    let format = ctx.format(OutputFormat::Table);

    let (activity_types, more) = if let Some(link) = next_link {
        let (client, _) = ctx.connect()?;
        let page = with_ctrl_c(client.list_next(link)).await?;
        (page.activity_types, page.next_link)
    } else {
        let (client, _, target) = ctx.connect_to(args)?;

        if all {
            let items = with_ctrl_c(list_all(
                &client,
                &target.resource_group,
                &target.data_factory,
                params,
            ))
            .await?;
            (items, None)
        } else {
            let page =
                with_ctrl_c(client.list(&target.resource_group, &target.data_factory, params))
                    .await?;
            (page.activity_types, page.next_link)
        }
    };
    info!("Listed {} activity types", activity_types.len());

    if ctx.wants_rows(format) {
        let rows: Vec<ActivityTypeRow<'_>> = activity_types.iter().map(Into::into).collect();
        ctx.print(&rows, format)?;
    } else {
        ctx.print(&activity_types, format)?;
    }

    if let Some(link) = more {
        eprintln!("More results available. Fetch the next page with:");
        eprintln!("  adfctl activity-type list --next-link '{}'", link);
    }
    Ok(())
}

fn print_upsert(
    ctx: &CommandContext<'_>,
    name: &str,
    response: &ActivityTypeCreateOrUpdateResponse,
) -> CliResult<()> {
    match ctx.output {
        cli::OutputFormat::Auto if ctx.query.is_none() => {
            let verb = if response.created() { "created" } else { "updated" };
            println!("Activity type '{}' {}.", name, verb);
            Ok(())
        }
        _ => ctx.print(response, ctx.format(OutputFormat::Json)),
    }
}

async fn handle_create(ctx: &CommandContext<'_>, file: &str, args: &ScopeArgs) -> CliResult<()> {
    let content = read_input(file)?;
    let activity_type: ActivityType =
        serde_json::from_str(&content).map_err(|e| AdfCtlError::InvalidInput {
            message: format!("'{}' is not an ActivityType document: {}", file, e),
        })?;

    let (client, _, target) = ctx.connect_to(args)?;

    let name = activity_type.name.clone();
    let params = ActivityTypeCreateOrUpdateParameters::new(activity_type);
    let response = with_ctrl_c(client.create_or_update(
        &target.resource_group,
        &target.data_factory,
        &params,
    ))
    .await?;

    print_upsert(ctx, &name, &response)
}

async fn handle_create_raw(
    ctx: &CommandContext<'_>,
    name: &str,
    content: String,
    args: &ScopeArgs,
) -> CliResult<()> {
    let (client, _, target) = ctx.connect_to(args)?;

    let params = ActivityTypeCreateOrUpdateWithRawJsonContentParameters::new(content);
    let response = with_ctrl_c(client.create_or_update_with_raw_json_content(
        &target.resource_group,
        &target.data_factory,
        name,
        &params,
    ))
    .await?;

    print_upsert(ctx, name, &response)
}

async fn handle_delete(
    ctx: &CommandContext<'_>,
    name: &str,
    no_wait: bool,
    wait_timeout: Option<u64>,
    wait_interval: Option<u64>,
    args: &ScopeArgs,
) -> CliResult<()> {
    let (client, profile, target) = ctx.connect_to(args)?;

    let initial = with_ctrl_c(client.begin_delete(
        &target.resource_group,
        &target.data_factory,
        name,
    ))
    .await?;

    let response = if no_wait || initial.is_terminal() {
        initial
    } else {
        let mut config = profile.long_running.clone();
        if let Some(timeout) = wait_timeout {
            config.timeout_secs = timeout;
        }
        if let Some(interval) = wait_interval {
            config.initial_delay_secs = Some(interval);
            config.retry_delay_secs = Some(interval);
        }
        wait_for_delete(&client, name, initial, &config).await?
    };

    match ctx.output {
        cli::OutputFormat::Auto if ctx.query.is_none() => {
            match (response.status, &response.operation_status_link) {
                (OperationStatus::InProgress, Some(link)) => {
                    println!("Delete of activity type '{}' accepted.", name);
                    println!("Status: {}", link);
                }
                (OperationStatus::InProgress, None) => {
                    println!("Delete of activity type '{}' accepted.", name);
                }
                _ => println!("Activity type '{}' deleted.", name),
            }
            Ok(())
        }
        _ => ctx.print(&response, ctx.format(OutputFormat::Json)),
    }
}

/// Poll a delete to completion behind a spinner
async fn wait_for_delete(
    client: &DataFactoryClient,
    name: &str,
    initial: LongRunningOperationResponse,
    config: &datafactory_core::config::LongRunningConfig,
) -> CliResult<LongRunningOperationResponse> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
    {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Deleting activity type {}", name));

    let pb_clone = pb.clone();
    let label = name.to_string();
    let progress_callback: ProgressCallback = Box::new(move |event: ProgressEvent| match &event {
        ProgressEvent::Started { .. } => {
            pb_clone.set_message(format!(
                "Deleting {}: {}",
                label,
                format_status(OperationStatus::InProgress)
            ));
        }
        ProgressEvent::Polling { status, .. } => {
            pb_clone.set_message(format!("Deleting {}: {}", label, format_status(*status)));
        }
        ProgressEvent::Completed { .. } => {
            pb_clone.finish_with_message(format!(
                "Deleted {}: {}",
                label,
                format_status(OperationStatus::Succeeded)
            ));
        }
        ProgressEvent::Failed { error, .. } => {
            pb_clone.finish_with_message(format!("Delete of {} failed: {}", label, error));
        }
    });

    let result =
        with_ctrl_c(poll_until_complete(client, initial, config, Some(progress_callback))).await;
    if result.is_err() && !pb.is_finished() {
        pb.abandon();
    }
    result
}

/// Format an operation status for display with status icons
fn format_status(status: OperationStatus) -> String {
    match status {
        OperationStatus::Succeeded => format!("\u{2713} {}", status),
        OperationStatus::Failed => format!("\u{2717} {}", status),
        OperationStatus::InProgress => format!("\u{21bb} {}", status),
    }
}
