// ABOUTME: Command handlers for the berth CLI.
// ABOUTME: Each subcommand drives exactly one lifecycle operation.

use crate::cli::Commands;
use berth::error::{Error, Result};
use berth::lifecycle::{ContainerLifecycle, Operation};
use berth::output::Output;
use berth::types::{ContainerRecord, CreateOutcome, CreateParams};

/// Run one subcommand against `adapter`.
pub async fn dispatch(
    adapter: &dyn ContainerLifecycle,
    command: Commands,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::List => {
            let records = adapter.list().await?;
            output.records(&records);
            Ok(())
        }
        Commands::Create {
            name,
            image,
            command,
            env,
            memory,
            hostname,
        } => {
            let mut params = CreateParams::new(&name, image);
            params.command = command;
            params.memory_limit = memory;
            params.hostname = hostname;
            for (key, value) in env {
                params = params.with_env(key, value);
            }
            create(adapter, &params, output).await
        }
        Commands::Start { name } => {
            act(Operation::Start, adapter, &name, output, adapter.start(&name)).await
        }
        Commands::Stop { name } => {
            act(Operation::Stop, adapter, &name, output, adapter.stop(&name)).await
        }
        Commands::Restart { name } => {
            act(Operation::Restart, adapter, &name, output, adapter.restart(&name)).await
        }
        Commands::Pause { name } => {
            act(Operation::Pause, adapter, &name, output, adapter.pause(&name)).await
        }
        Commands::Unpause { name } => {
            act(Operation::Unpause, adapter, &name, output, adapter.unpause(&name)).await
        }
        Commands::Delete { name } => {
            act(Operation::Delete, adapter, &name, output, adapter.delete(&name)).await
        }
        Commands::Inspect { name } => {
            if !adapter.supports(Operation::Inspect) {
                output.skipped(Operation::Inspect.as_str(), &name);
                return Ok(());
            }
            let status = adapter.inspect(&name).await?.ok_or(Error::NotFound(name))?;
            output.status(&status);
            Ok(())
        }
        Commands::Logs { name } => {
            let logs = adapter.logs(&name).await?.ok_or(Error::NotFound(name))?;
            output.command_output(&logs);
            Ok(())
        }
        Commands::Exec { name, command } => {
            let result = adapter
                .execute(&name, &command)
                .await?
                .ok_or(Error::NotFound(name))?;
            output.command_output(&result);
            Ok(())
        }
    }
}

async fn create(adapter: &dyn ContainerLifecycle, params: &CreateParams, output: &Output) -> Result<()> {
    let outcome = adapter.create(params).await?;
    output.created(&params.name, &outcome);
    match outcome {
        CreateOutcome::Created { .. } => Ok(()),
        CreateOutcome::Failed { reason } => Err(Error::CreateFailed {
            name: params.name.clone(),
            reason,
        }),
    }
}

async fn act<F>(
    operation: Operation,
    adapter: &dyn ContainerLifecycle,
    name: &str,
    output: &Output,
    call: F,
) -> Result<()>
where
    F: Future<Output = berth::lifecycle::Result<Option<ContainerRecord>>>,
{
    if !adapter.supports(operation) {
        output.skipped(operation.as_str(), name);
        return Ok(());
    }

    let record = call.await?.ok_or_else(|| Error::NotFound(name.to_string()))?;
    output.acted(operation.as_str(), &record);
    Ok(())
}
