use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use gads_cli::{
    Res,
    cli::{self, Output, Status, auth::LoginOptions, insights::DateRange, keywords::MatchType},
    config, error, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print results as JSON
    #[clap(long, global = true)]
    json: bool,

    /// Print results as indented JSON (implies --json)
    #[clap(long, global = true)]
    pretty: bool,

    /// Log requests and token handling to stderr
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage authentication
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Manage Google Ads accounts
    #[command(subcommand)]
    Accounts(AccountsCommand),

    /// Run a raw GAQL query and print the rows as JSON
    Query(QueryOptions),

    /// Manage campaigns
    #[command(subcommand)]
    Campaigns(CampaignsCommand),

    /// Manage ad groups
    #[command(subcommand)]
    Adgroups(AdGroupsCommand),

    /// Manage keywords
    #[command(subcommand)]
    Keywords(KeywordsCommand),

    /// Manage responsive search ads
    #[command(subcommand)]
    Ads(AdsCommand),

    /// Performance reporting
    #[command(subcommand)]
    Insights(InsightsCommand),

    /// Configuration paths and authentication status
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Authenticate through the browser and store credentials
    Login(LoginArgs),
    /// Show the stored authentication state
    Status,
    /// Show the stored tokens, masked
    Token,
    /// Validate credentials with a live API call
    Check,
    /// Remove stored credentials
    Logout,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Client JSON downloaded from the Google Cloud Console
    #[clap(long)]
    credentials_file: Option<PathBuf>,
    #[clap(long)]
    client_id: Option<String>,
    #[clap(long)]
    client_secret: Option<String>,
    #[clap(long)]
    developer_token: Option<String>,
    /// Manager account (MCC) customer id
    #[clap(long)]
    manager_account: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AccountsCommand {
    /// List accessible customer accounts
    List,
}

#[derive(Args, Debug, Clone)]
pub struct AccountArg {
    /// Customer account id, dashes allowed
    #[clap(long)]
    account: String,
}

#[derive(Args, Debug, Clone)]
pub struct QueryOptions {
    #[clap(flatten)]
    account: AccountArg,
    /// GAQL statement
    query: String,
}

#[derive(Args, Debug, Clone)]
pub struct CampaignArgs {
    #[clap(flatten)]
    account: AccountArg,
    #[clap(long)]
    campaign: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CampaignsCommand {
    /// List campaigns in an account
    List(AccountArg),
    /// Show details of one campaign
    Get(CampaignArgs),
    /// Set a campaign to PAUSED
    Pause(CampaignArgs),
    /// Set a campaign to ENABLED
    Enable(CampaignArgs),
    /// Update the daily budget of a campaign
    Budget {
        #[clap(flatten)]
        target: CampaignArgs,
        /// New daily budget in micros (5000000 = 5.00)
        #[clap(long)]
        amount: i64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AdGroupArgs {
    #[clap(flatten)]
    account: AccountArg,
    #[clap(long)]
    adgroup: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdGroupsCommand {
    /// List ad groups of a campaign
    List(CampaignArgs),
    /// Set an ad group to PAUSED
    Pause(AdGroupArgs),
    /// Set an ad group to ENABLED
    Enable(AdGroupArgs),
}

#[derive(Args, Debug, Clone)]
pub struct KeywordArgs {
    #[clap(flatten)]
    account: AccountArg,
    /// Keyword id as <adGroupId>~<criterionId>
    #[clap(long)]
    keyword: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeywordsCommand {
    /// List keywords of a campaign
    List(CampaignArgs),
    /// Add a keyword to an ad group
    Add {
        #[clap(flatten)]
        target: AdGroupArgs,
        /// Keyword text
        #[clap(long)]
        keyword: String,
        #[clap(long, value_enum, ignore_case = true)]
        match_type: MatchType,
    },
    /// Set a keyword to PAUSED
    Pause(KeywordArgs),
    /// Set a keyword to ENABLED
    Enable(KeywordArgs),
    /// Remove a keyword
    Remove(KeywordArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AdArgs {
    #[clap(flatten)]
    account: AccountArg,
    /// Ad id as <adGroupId>~<adId>
    #[clap(long)]
    ad: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdsCommand {
    /// List responsive search ads of an ad group
    List(AdGroupArgs),
    /// Set an ad to PAUSED
    Pause(AdArgs),
    /// Set an ad to ENABLED
    Enable(AdArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DateRangeArgs {
    /// Number of days to look back, ending yesterday
    #[clap(long, default_value_t = cli::insights::DEFAULT_DAYS)]
    days: u32,
    /// Start date YYYY-MM-DD (overrides --days, needs --end)
    #[clap(long, requires = "end")]
    start: Option<String>,
    /// End date YYYY-MM-DD (overrides --days, needs --start)
    #[clap(long, requires = "start")]
    end: Option<String>,
}

impl DateRangeArgs {
    fn resolve(&self) -> Res<DateRange> {
        DateRange::from_args(self.days, self.start.as_deref(), self.end.as_deref())
    }
}

#[derive(Args, Debug, Clone)]
pub struct InsightsArgs {
    #[clap(flatten)]
    target: CampaignArgs,
    #[clap(flatten)]
    range: DateRangeArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum InsightsCommand {
    /// Campaign performance: impressions, clicks, cost, CTR, CPC, conversions, ROAS
    Campaigns {
        #[clap(flatten)]
        account: AccountArg,
        #[clap(flatten)]
        range: DateRangeArgs,
    },
    /// Ad group performance of a campaign
    Adgroups(InsightsArgs),
    /// Keyword performance of a campaign
    Keywords(InsightsArgs),
    /// Search terms that triggered the ads of a campaign
    SearchTerms(InsightsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("gads_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
    }
}

async fn run(args: Cli) -> Res<()> {
    let output = Output::new(args.json, args.pretty);

    match args.command {
        Command::Auth(cmd) => match cmd {
            AuthCommand::Login(login) => {
                cli::auth::login(LoginOptions {
                    credentials_file: login.credentials_file,
                    client_id: login.client_id,
                    client_secret: login.client_secret,
                    developer_token: login.developer_token,
                    manager_account: login.manager_account,
                })
                .await
            }
            AuthCommand::Status => cli::auth::status().await,
            AuthCommand::Token => cli::auth::token().await,
            AuthCommand::Check => cli::auth::check().await,
            AuthCommand::Logout => cli::auth::logout().await,
        },

        Command::Accounts(AccountsCommand::List) => cli::accounts::list(output).await,

        Command::Query(opt) => cli::query::run(output, &opt.account.account, &opt.query).await,

        Command::Campaigns(cmd) => match cmd {
            CampaignsCommand::List(a) => cli::campaigns::list(output, &a.account).await,
            CampaignsCommand::Get(c) => {
                cli::campaigns::get(output, &c.account.account, &c.campaign).await
            }
            CampaignsCommand::Pause(c) => {
                cli::campaigns::set_campaign_status(&c.account.account, &c.campaign, Status::Paused)
                    .await
            }
            CampaignsCommand::Enable(c) => {
                cli::campaigns::set_campaign_status(
                    &c.account.account,
                    &c.campaign,
                    Status::Enabled,
                )
                .await
            }
            CampaignsCommand::Budget { target, amount } => {
                cli::campaigns::budget(&target.account.account, &target.campaign, amount).await
            }
        },

        Command::Adgroups(cmd) => match cmd {
            AdGroupsCommand::List(c) => {
                cli::adgroups::list(output, &c.account.account, &c.campaign).await
            }
            AdGroupsCommand::Pause(g) => {
                cli::adgroups::set_ad_group_status(&g.account.account, &g.adgroup, Status::Paused)
                    .await
            }
            AdGroupsCommand::Enable(g) => {
                cli::adgroups::set_ad_group_status(&g.account.account, &g.adgroup, Status::Enabled)
                    .await
            }
        },

        Command::Keywords(cmd) => match cmd {
            KeywordsCommand::List(c) => {
                cli::keywords::list(output, &c.account.account, &c.campaign).await
            }
            KeywordsCommand::Add {
                target,
                keyword,
                match_type,
            } => {
                cli::keywords::add(&target.account.account, &target.adgroup, &keyword, match_type)
                    .await
            }
            KeywordsCommand::Pause(k) => {
                cli::keywords::set_keyword_status(&k.account.account, &k.keyword, Status::Paused)
                    .await
            }
            KeywordsCommand::Enable(k) => {
                cli::keywords::set_keyword_status(&k.account.account, &k.keyword, Status::Enabled)
                    .await
            }
            KeywordsCommand::Remove(k) => {
                cli::keywords::remove(&k.account.account, &k.keyword).await
            }
        },

        Command::Ads(cmd) => match cmd {
            AdsCommand::List(g) => cli::ads::list(output, &g.account.account, &g.adgroup).await,
            AdsCommand::Pause(a) => {
                cli::ads::set_ad_status(&a.account.account, &a.ad, Status::Paused).await
            }
            AdsCommand::Enable(a) => {
                cli::ads::set_ad_status(&a.account.account, &a.ad, Status::Enabled).await
            }
        },

        Command::Insights(cmd) => match cmd {
            InsightsCommand::Campaigns { account, range } => {
                cli::insights::campaigns(output, &account.account, range.resolve()?).await
            }
            InsightsCommand::Adgroups(i) => {
                let range = i.range.resolve()?;
                cli::insights::ad_groups(output, &i.target.account.account, &i.target.campaign, range)
                    .await
            }
            InsightsCommand::Keywords(i) => {
                let range = i.range.resolve()?;
                cli::insights::keywords(output, &i.target.account.account, &i.target.campaign, range)
                    .await
            }
            InsightsCommand::SearchTerms(i) => {
                let range = i.range.resolve()?;
                cli::insights::search_terms(
                    output,
                    &i.target.account.account,
                    &i.target.campaign,
                    range,
                )
                .await
            }
        },

        Command::Info => cli::info::info(output).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
