//! Example walking the deployment and team endpoints with the blocking
//! client.
//!
//! Run with:
//! ```bash
//! MODELZ_API_KEY=mzi-... MODELZ_LOGIN_NAME=ada MODELZ_CLUSTER_ID=c-7 \
//!     cargo run --example deployments
//! ```

use std::error::Error;

use modelz::{BlockingClient, Config, EnvConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let login_name = std::env::var("MODELZ_LOGIN_NAME")
        .expect("MODELZ_LOGIN_NAME environment variable must be set");
    let cluster_id = std::env::var("MODELZ_CLUSTER_ID")
        .expect("MODELZ_CLUSTER_ID environment variable must be set");
    let project = std::env::var("MODELZ_PROJECT").unwrap_or_else(|_| "llama-7b".to_string());

    let client = BlockingClient::new(Config::new(project).apply_env(EnvConfig::from_env()))?;

    println!("=== Deployments on {cluster_id} ===");
    match client.deployments().list(&login_name, &cluster_id)? {
        Some(list) => {
            for deployment in &list.deployments {
                println!(
                    "{}  {}  {}  x{}",
                    deployment.id, deployment.name, deployment.status, deployment.replicas
                );
            }
        }
        None => println!("(no deployments, or the cluster was not found)"),
    }
    println!();

    println!("=== Teams for {login_name} ===");
    let team_name = std::env::var("MODELZ_TEAM").unwrap_or_else(|_| "ml-infra".to_string());
    match client.teams().get(&login_name, &team_name)? {
        Some(team) => println!(
            "{} ({} members)",
            team.display_name.as_deref().unwrap_or(&team.name),
            team.members.len()
        ),
        None => println!("team {team_name} not found"),
    }

    Ok(())
}
