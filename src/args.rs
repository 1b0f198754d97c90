use duration_string::DurationString;
use gumdrop::Options;

/// Deploy a git repository into a work directory on authenticated webhook calls.
#[derive(Debug, Options)]
pub struct Args {
    /// The git repository to deploy (a clone, or a mirror if the work directory is separate).
    #[options(free)]
    pub directory: Option<String>,

    /// The directory to check out to. If empty, the repository is pulled in place.
    #[options(short = "w", long = "work-dir")]
    pub work_dir: Option<String>,

    /// The branch to check out to the work directory.
    #[options(short = "b", default = "master")]
    pub branch: String,

    /// The remote to fetch from.
    #[options(short = "r", default = "origin")]
    pub remote: String,

    /// Discard local changes with git reset --hard before every deployment.
    #[options(no_short)]
    pub reset: bool,

    /// Update the submodules after every deployment.
    #[options(no_short, long = "sync-submodules")]
    pub sync_submodules: bool,

    /// The path to the git binary.
    #[options(no_short, long = "git", default = "git")]
    pub git_binary_path: String,

    /// The deploy log file.
    #[options(short = "l", long = "log", default = "deploy.log")]
    pub log: String,

    /// Disable the deploy log file.
    #[options(no_short, long = "no-log")]
    pub no_log: bool,

    /// The timestamp format of the deploy log (e.g. "[year]-[month]-[day] [hour]:[minute]:[second]").
    #[options(no_short, long = "date-format")]
    pub date_format: Option<String>,

    /// Kill git commands running longer than this, "0s" waits forever.
    ///
    /// Can be a number postfixed with s(econd), m(inutes), h(ours), d(ays)
    #[options(short = "t", default = "5m")]
    pub timeout: DurationString,

    /// The command to run in the work directory after every deployment.
    #[options(short = "s", long = "post-deploy")]
    pub post_deploy: Option<String>,

    /// Run the post-deploy command in a shell.
    #[options(short = "S")]
    pub shell: bool,

    /// Runs an HTTP server on the URL, which deploys when called with the secret key.
    #[options(no_short)]
    pub http: Option<String>,

    /// The secret key, passed as the "key" query parameter (default: $DEPLOY_HOOK_SECRET).
    #[options(short = "k")]
    pub secret: Option<String>,

    /// Deploy only once. Useful for cronjobs.
    #[options(short = "o")]
    pub once: bool,

    /// Increase verbosity, can be set multiple times (-v debug, -vv tracing)
    #[options(count)]
    pub verbose: u8,

    /// Only print error messages.
    #[options(short = "q")]
    pub quiet: bool,

    /// Print the current version.
    #[options(short = "V")]
    pub version: bool,

    /// Print this help.
    #[options()]
    pub help: bool,
}

pub fn parse_args() -> Args {
    Args::parse_args_default_or_exit()
}
