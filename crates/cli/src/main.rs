//! CLI for the Waymark POD permission repair tool.
//!
//! Pipeline per command: connect -> fetch ACL -> reconcile or report.

use clap::{Parser, Subcommand, ValueEnum};
use waymark_acl::{acl_path, Reconciler};
use waymark_core::error::WaymarkError;
use waymark_pod::{jsonld, AclStore, HttpPodClient};

#[derive(Parser, Debug)]
#[command(name = "waymark", version, about = "Solid POD ACL repair and route inspection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ensure a resource's ACL grants a required permission profile.
    Ensure {
        #[arg(short, long, env = "WAYMARK_POD_URL")]
        pod_url: String,

        #[arg(short, long, env = "WAYMARK_WEB_ID")]
        web_id: String,

        /// Resource path, relative to the POD root or absolute.
        #[arg(short, long)]
        resource: String,

        #[arg(long, value_enum)]
        profile: Profile,

        /// Agent WebID; required by the agent-scoped profiles.
        #[arg(short, long)]
        agent: Option<String>,

        /// Print the resulting entry list as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Fetch and render a resource's ACL entry list.
    Inspect {
        #[arg(short, long, env = "WAYMARK_POD_URL")]
        pod_url: String,

        #[arg(short, long, env = "WAYMARK_WEB_ID")]
        web_id: String,

        #[arg(short, long)]
        resource: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Fetch a route document and print a summary.
    Route {
        #[arg(short, long, env = "WAYMARK_POD_URL")]
        pod_url: String,

        /// Route document URL.
        #[arg(short, long)]
        url: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Profile {
    /// Everyone may append (inbox repair).
    AppendEveryone,
    /// Everyone may read (public settings).
    ReadEveryone,
    /// A named agent may read (route sharing).
    ReadAgent,
    /// A named agent may read and write (collaboration).
    ReadWriteAgent,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ensure {
            pod_url,
            web_id,
            resource,
            profile,
            agent,
            json,
        } => {
            tracing::info!(pod_url = %pod_url, resource = %resource, ?profile, "starting repair");

            let client = HttpPodClient::connect(&pod_url)?;
            let reconciler = Reconciler::new(client, web_id.clone());

            let outcome = match profile {
                Profile::AppendEveryone => {
                    reconciler.ensure_append_for_everyone(&resource).await?
                }
                Profile::ReadEveryone => reconciler.ensure_read_for_everyone(&resource).await?,
                Profile::ReadAgent => {
                    let agent = require_agent(agent)?;
                    reconciler.ensure_read_for_agent(&resource, &agent).await?
                }
                Profile::ReadWriteAgent => {
                    let agent = require_agent(agent)?;
                    reconciler
                        .ensure_read_write_for_agent(&resource, &agent)
                        .await?
                }
            };

            println!("{outcome:?}");

            if json {
                let entries = reconciler
                    .store()
                    .get_permissions(&web_id, &resource, &acl_path(&resource))
                    .await?;
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }

        Commands::Inspect {
            pod_url,
            web_id,
            resource,
            json,
        } => {
            let client = HttpPodClient::connect(&pod_url)?;
            let entries = client
                .get_permissions(&web_id, &resource, &acl_path(&resource))
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", waymark_acl::report::render(&resource, &entries));
            }
        }

        Commands::Route { pod_url, url } => {
            let client = HttpPodClient::connect(&pod_url)?;
            let route = jsonld::load_route(&client, &url).await?;

            println!("Name:        {}", route.name);
            println!("Description: {}", route.description);
            println!("Points:      {}", route.itinerary.len());
            println!("Media:       {}", route.media.len());
            println!("Comments:    {}", route.comments.len());
        }
    }

    Ok(())
}

fn require_agent(agent: Option<String>) -> Result<String, WaymarkError> {
    agent.ok_or_else(|| {
        WaymarkError::InvalidInput("--agent is required for agent-scoped profiles".into())
    })
}
