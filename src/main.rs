use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tenant_console::auth::AuthService;
use tenant_console::models::TenantDetail;
use tenant_console::views::{AcceptInviteForm, LoginForm, TenantForm};
use tenant_console::{Config, ConfigManager, Console, Location, Page};

#[derive(Debug, Parser)]
#[command(name = "tenant-console", version, about = "Administration console for the sports platform")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, env = "TENANT_CONSOLE_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TENANT_CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Navigate to an application path, following guards and redirects
    Open { path: String },
    /// Tenant administration (superadmin)
    Tenants {
        #[command(subcommand)]
        command: TenantCommand,
    },
    /// Create an owner account from an invitation token and sign in
    AcceptInvite {
        token: String,
        #[arg(long, env = "TENANT_CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
}

#[derive(Debug, Subcommand)]
enum TenantCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        contact_email: String,
        #[arg(long, default_value = "")]
        logo_url: String,
        #[arg(long, default_value = "")]
        theme_primary: String,
        #[arg(long, default_value = "")]
        theme_secondary: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Create the tenant disabled
        #[arg(long)]
        inactive: bool,
    },
    Show { id: i64 },
    InviteOwner { id: i64, email: String },
    AssignOwner { id: i64, user_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    let env_file_path = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "tenant_console=debug,warn".into()
            } else {
                "tenant_console=info,warn".into()
            }
        }))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    match env_file_path {
        Some(path) => info!("Loaded environment variables from {}", path.display()),
        None => debug!("No .env file found. Using existing environment variables."),
    };

    let cli = Cli::parse();
    let config = load_config(cli.config).await?;
    let console = Console::new(config).context("Failed to start console")?;
    console.restore().await;

    run(&console, cli.command).await
}

async fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let manager = match path {
        Some(path) => ConfigManager::load(path).await?,
        None => ConfigManager::new().await?,
    };
    debug!(path = %manager.path().display(), "Configuration ready");
    Ok(manager.get_config().await)
}

async fn run(console: &Console, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let mut view = console.login_view();
            match view.submit(&LoginForm { email, password }).await {
                Some(user) => {
                    println!("Signed in as {} ({})", user.profile.display_name(), user.role);
                    println!("-> {}", console.router().current());
                }
                None => fail(view.error(), view.invalid_fields())?,
            }
        }
        Command::Logout => {
            console.auth().logout();
            println!("Signed out");
        }
        Command::Whoami => {
            if !console.auth().ensure_profile_loaded().await {
                bail!("Not signed in");
            }
            match console.auth().current_user() {
                Some(user) => {
                    println!("{} <{}>", user.profile.display_name(), user.profile.email);
                    println!("role:   {}", user.role);
                    if let Some(tenant) = user.tenant {
                        println!("tenant: {} ({})", tenant.name, tenant.slug);
                    }
                    println!(
                        "home:   {}",
                        AuthService::default_route_for_role(Some(user.role))
                    );
                }
                None => bail!("Not signed in"),
            }
        }
        Command::Refresh => match console.auth().refresh_tokens().await? {
            Some(_) => println!("Access token refreshed"),
            None => bail!("No refresh token stored; sign in first"),
        },
        Command::Open { path } => {
            let location = console.router().navigate(&path).await?;
            print_location(&location);
        }
        Command::Tenants { command } => run_tenants(console, command).await?,
        Command::AcceptInvite {
            token,
            password,
            first_name,
            last_name,
        } => {
            open_page(console, &format!("/accept-invite/{token}"), Page::AcceptInvite).await?;
            let mut view = console.accept_invite_view(&token);
            let form = AcceptInviteForm {
                password,
                first_name,
                last_name,
            };
            match view.submit(&form).await {
                Some(user) => {
                    println!("Welcome {}", user.profile.display_name());
                    println!("-> {}", console.router().current());
                }
                None => fail(view.error(), view.invalid_fields())?,
            }
        }
    }
    Ok(())
}

async fn run_tenants(console: &Console, command: TenantCommand) -> anyhow::Result<()> {
    match command {
        TenantCommand::List => {
            open_page(console, "/superadmin/tenants", Page::TenantList).await?;
            let mut view = console.tenant_list_view();
            view.fetch().await;
            if let Some(error) = view.error() {
                bail!("{error}");
            }
            for tenant in view.tenants() {
                print_tenant_row(tenant);
            }
        }
        TenantCommand::Create {
            name,
            slug,
            contact_email,
            logo_url,
            theme_primary,
            theme_secondary,
            address,
            inactive,
        } => {
            open_page(console, "/superadmin/tenants/new", Page::TenantCreate).await?;
            let mut view = console.tenant_create_view();
            let form = TenantForm {
                name,
                slug,
                contact_email,
                logo_url,
                theme_primary,
                theme_secondary,
                address,
                is_active: !inactive,
            };
            match view.submit(&form).await {
                Some(tenant) => {
                    println!("Created tenant #{}", tenant.id());
                    print_tenant_row(&tenant);
                }
                None => fail(view.error(), view.invalid_fields())?,
            }
        }
        TenantCommand::Show { id } => {
            open_page(console, &format!("/superadmin/tenants/{id}"), Page::TenantDetail).await?;
            let mut view = console.tenant_detail_view();
            view.load(id).await;
            match view.tenant() {
                Some(tenant) => print_tenant_detail(tenant),
                None => fail(view.error(), &[])?,
            }
        }
        TenantCommand::InviteOwner { id, email } => {
            open_page(console, &format!("/superadmin/tenants/{id}"), Page::TenantDetail).await?;
            let mut view = console.tenant_detail_view();
            view.load(id).await;
            if view.tenant().is_none() {
                fail(view.error(), &[])?;
            }
            view.invite_owner(&email).await;
            match view.info() {
                Some(info) => println!("{info}"),
                None => fail(view.error(), &[])?,
            }
        }
        TenantCommand::AssignOwner { id, user_id } => {
            open_page(console, &format!("/superadmin/tenants/{id}"), Page::TenantDetail).await?;
            console.tenants().assign_owner(id, user_id).await?;
            println!("User #{user_id} is now an owner of tenant #{id}");
        }
    }
    Ok(())
}

/// Navigate like the browser would and refuse to continue when a guard
/// sends us elsewhere
async fn open_page(console: &Console, path: &str, expected: Page) -> anyhow::Result<Location> {
    let location = console.router().navigate(path).await?;
    if location.page != expected {
        bail!("Access denied, redirected to {}", location.path);
    }
    Ok(location)
}

fn fail(error: Option<&str>, invalid: &[tenant_console::ConsoleError]) -> anyhow::Result<()> {
    for field in invalid {
        eprintln!("{field}");
    }
    match error {
        Some(message) => bail!("{message}"),
        None if !invalid.is_empty() => bail!("Invalid input"),
        None => bail!("Request failed"),
    }
}

fn print_location(location: &Location) {
    println!("{:?} at {}", location.page, location.path);
    let mut params: Vec<_> = location.params.iter().collect();
    params.sort();
    for (name, value) in params {
        println!("  {name} = {value}");
    }
}

fn print_tenant_row(tenant: &TenantDetail) {
    let status = match tenant.summary.is_active {
        Some(false) => "inactive",
        _ => "active",
    };
    println!(
        "{:>5}  {:<24} {:<20} {:<8} owners: {}",
        tenant.id(),
        tenant.summary.name,
        tenant.summary.slug,
        status,
        tenant.owner_count()
    );
}

fn print_tenant_detail(tenant: &TenantDetail) {
    let summary = &tenant.summary;
    println!("#{} {} ({})", summary.id, summary.name, summary.slug);
    let optional = [
        ("contact", &summary.contact_email),
        ("address", &summary.address),
        ("logo", &summary.logo_url),
        ("primary", &summary.theme_primary),
        ("secondary", &summary.theme_secondary),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("  {label:<9} {value}");
        }
    }
    println!("  owners    {}", tenant.owner_count());
    for owner in tenant.owners.iter().flatten() {
        println!("    #{} {} {} <{}>", owner.id, owner.first_name, owner.last_name, owner.email);
    }
}
