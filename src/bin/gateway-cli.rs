use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query a running game gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway liveness and uptime
    Health,
    /// Show the gateway's public IP
    Ip,
    /// Look up a player
    Lookup {
        #[arg(value_enum)]
        game: GameArg,
        /// Client/session identifier echoed back in the response
        uid: String,
        /// Tag, summoner name, Riot ID (name#tag), PUUID or username
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GameArg {
    Brawl,
    Clash,
    Clashofclans,
    Lol,
    Valorant,
    ValorantRank,
    Fortnite,
}

impl GameArg {
    fn route(self) -> &'static [&'static str] {
        match self {
            GameArg::Brawl => &["api", "brawl"],
            GameArg::Clash => &["api", "clash"],
            GameArg::Clashofclans => &["api", "clashofclans"],
            GameArg::Lol => &["api", "lol"],
            GameArg::Valorant => &["api", "valorant"],
            GameArg::ValorantRank => &["api", "valorant", "rank"],
            GameArg::Fortnite => &["api", "fortnite"],
        }
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("cannot use '{}' as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = match &cli.command {
        Commands::Health => endpoint(&cli.url, &["health"])?,
        Commands::Ip => endpoint(&cli.url, &["my-ip"])?,
        Commands::Lookup { game, uid, id } => {
            let mut segments: Vec<&str> = game.route().to_vec();
            segments.push(uid.as_str());
            segments.push(id.as_str());
            endpoint(&cli.url, &segments)?
        }
    };

    let res = client.get(url).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }
    Ok(())
}
