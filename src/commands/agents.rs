use super::short_date;
use crate::cli::AgentsCommand;
use crate::client::{ApiClient, HttpTransport};
use crate::tokens::TokenStore;
use crate::types::{Agent, NewAgent};
use anyhow::Result;

fn print_agent(agent: &Agent) {
    println!(
        "{:>5}  {:<24} {:<10} {:<12} {}",
        agent.id,
        agent.name,
        agent.status,
        short_date(&agent.created_at),
        agent.capabilities.join(", ")
    );
}

pub async fn run<T: HttpTransport, S: TokenStore>(
    client: &ApiClient<T, S>,
    command: AgentsCommand,
) -> Result<()> {
    match command {
        AgentsCommand::List => {
            let agents = client.agents().list().await?;
            if agents.is_empty() {
                println!("No agents yet.");
                return Ok(());
            }
            println!("{:>5}  {:<24} {:<10} {:<12} capabilities", "id", "name", "status", "created");
            for agent in &agents {
                print_agent(agent);
            }
        }
        AgentsCommand::Get { id } => {
            let agent = client.agents().get(id).await?;
            println!("{} (#{}) - {}", agent.name, agent.id, agent.status);
            if let Some(description) = &agent.description {
                println!("  {description}");
            }
            if !agent.capabilities.is_empty() {
                println!("  capabilities: {}", agent.capabilities.join(", "));
            }
            println!("  created: {}", short_date(&agent.created_at));
        }
        AgentsCommand::Create {
            name,
            description,
            capabilities,
        } => {
            let created = client
                .agents()
                .create(&NewAgent {
                    name,
                    description,
                    capabilities: (!capabilities.is_empty()).then_some(capabilities),
                })
                .await?;
            println!("Created agent {} (#{}).", created.name, created.id);
        }
        AgentsCommand::Delete { id } => {
            client.agents().delete(id).await?;
            println!("Deleted agent #{id}.");
        }
        AgentsCommand::Capabilities => {
            for capability in client.agents().available_capabilities().await? {
                println!("{capability}");
            }
        }
    }
    Ok(())
}
