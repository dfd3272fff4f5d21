use clap::{Args, Subcommand, ValueEnum};
use storefront::{
    config::StorefrontConfig,
    session::{Access, AuthToken, Role, Session, SessionUser},
};

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Store a token issued by the backend login endpoint
    Login(LoginArgs),

    /// Forget the stored login
    Logout,

    /// Show who is signed in
    Status,

    /// Exit non-zero unless the signed-in user has the given access
    Check(CheckArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Admin,
    Customer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Customer => Role::Customer,
        }
    }
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Username
    #[arg(long)]
    username: String,

    /// Role granted by the backend
    #[arg(long, value_enum, default_value_t = RoleArg::Admin)]
    role: RoleArg,

    /// Bearer token returned by the backend
    #[arg(long, env = "STOREFRONT_TOKEN", hide_env_values = true)]
    token: String,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Require the admin role
    #[arg(long)]
    admin: bool,
}

pub(crate) fn run(command: SessionCommand, config: &StorefrontConfig) -> Result<(), String> {
    let store = config.storage.file_store();
    let mut session = Session::open(&store);

    match command.command {
        SessionSubcommand::Login(args) => {
            let token = AuthToken::new(args.token).map_err(|error| error.to_string())?;
            let user = SessionUser::new(&args.username, args.role.into())
                .map_err(|error| error.to_string())?;

            session.login(token, user);

            println!("logged in as {}", args.username.trim());
        }
        SessionSubcommand::Logout => {
            session.logout();

            println!("logged out");
        }
        SessionSubcommand::Status => match session.current_user() {
            Some(user) => println!("{} ({:?})", user.username(), user.role()),
            None => println!("logged out"),
        },
        SessionSubcommand::Check(args) => {
            let access = if args.admin {
                Access::AdminOnly
            } else {
                Access::Authenticated
            };

            let user = session
                .authorize(access)
                .map_err(|error| error.to_string())?;

            println!("ok: {}", user.username());
        }
    }

    Ok(())
}
