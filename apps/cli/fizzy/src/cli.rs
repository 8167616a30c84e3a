//! Command-line surface for `fizzy`.
//!
//! Mandatory flags are modelled as `Option` and checked by the handlers so
//! that a missing flag produces an `INVALID_ARGS` envelope rather than clap's
//! own usage text.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fizzy", version, about = "Command-line interface for the Fizzy API", long_about = None)]
pub struct Cli {
    /// API access token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Account slug
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// API base URL
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Show request/response details on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage boards
    Board {
        #[command(subcommand)]
        action: BoardCmd,
    },
    /// Manage cards
    Card {
        #[command(subcommand)]
        action: CardCmd,
    },
    /// Manage board columns
    Column {
        #[command(subcommand)]
        action: ColumnCmd,
    },
    /// Manage card comments
    Comment {
        #[command(subcommand)]
        action: CommentCmd,
    },
    /// Manage card steps
    Step {
        #[command(subcommand)]
        action: StepCmd,
    },
    /// Manage comment reactions
    Reaction {
        #[command(subcommand)]
        action: ReactionCmd,
    },
    /// Manage notifications
    Notification {
        #[command(subcommand)]
        action: NotificationCmd,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: TagCmd,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCmd,
    },
    /// Show the authenticated identity
    Identity {
        #[command(subcommand)]
        action: IdentityCmd,
    },
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: AuthCmd,
    },
    /// Upload files for rich text fields
    Upload {
        #[command(subcommand)]
        action: UploadCmd,
    },
    /// Print version information
    Version,
}

/// `--page` and `--all` shared by list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Fetch all pages
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand, Debug)]
pub enum BoardCmd {
    /// List all boards
    List(PageArgs),
    /// Show a board
    Show { board_id: String },
    /// Create a board
    Create {
        #[arg(long)]
        name: Option<String>,
        /// Allow all team members access (true/false)
        #[arg(long = "all-access", alias = "all_access")]
        all_access: Option<String>,
        /// Auto postpone period in days
        #[arg(long = "auto-postpone-period", alias = "auto_postpone_period")]
        auto_postpone_period: Option<u32>,
    },
    /// Update a board
    Update {
        board_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "all-access", alias = "all_access")]
        all_access: Option<String>,
        #[arg(long = "auto-postpone-period", alias = "auto_postpone_period")]
        auto_postpone_period: Option<u32>,
    },
    /// Delete a board
    Delete { board_id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CardListArgs {
    /// Filter by board ID
    #[arg(long)]
    pub board: Option<String>,
    /// Filter by column ID or pseudo column (not-now, maybe, done)
    #[arg(long)]
    pub column: Option<String>,
    /// Filter by tag ID
    #[arg(long)]
    pub tag: Option<String>,
    /// Filter by lane (all, closed, not_now, stalled, postponing_soon, golden)
    #[arg(long = "indexed-by", alias = "status")]
    pub indexed_by: Option<String>,
    /// Filter by assignee ID
    #[arg(long)]
    pub assignee: Option<String>,
    #[command(flatten)]
    pub pages: PageArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CardCreateArgs {
    /// Board ID (defaults to the configured board)
    #[arg(long)]
    pub board: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    /// Card description (HTML)
    #[arg(long)]
    pub description: Option<String>,
    /// Read description from file
    #[arg(long = "description-file", alias = "description_file")]
    pub description_file: Option<PathBuf>,
    /// Comma-separated tag IDs
    #[arg(long = "tag-ids")]
    pub tag_ids: Option<String>,
    /// Header image signed ID
    #[arg(long)]
    pub image: Option<String>,
    /// Custom created_at timestamp
    #[arg(long = "created-at")]
    pub created_at: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CardUpdateArgs {
    pub card_number: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "description-file", alias = "description_file")]
    pub description_file: Option<PathBuf>,
    #[arg(long = "created-at")]
    pub created_at: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CardCmd {
    /// List cards
    List(CardListArgs),
    /// Show a card
    Show { card_number: String },
    /// Create a card
    Create(CardCreateArgs),
    /// Update a card
    Update(CardUpdateArgs),
    /// Delete a card
    Delete { card_number: String },
    /// Close a card
    Close { card_number: String },
    /// Reopen a closed card
    Reopen { card_number: String },
    /// Move a card to Not Now
    Postpone { card_number: String },
    /// Move a card to a column or pseudo column
    Column {
        card_number: String,
        #[arg(long)]
        column: Option<String>,
    },
    /// Send a card back to triage
    Untriage { card_number: String },
    /// Toggle a user's assignment on a card
    Assign {
        card_number: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Toggle a tag on a card
    Tag {
        card_number: String,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Watch a card
    Watch { card_number: String },
    /// Stop watching a card
    Unwatch { card_number: String },
    /// View and download card attachments
    Attachments {
        #[command(subcommand)]
        action: AttachmentCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttachmentCmd {
    /// List attachments embedded in a card's description
    Show { card_number: String },
    /// Download one attachment (1-based index) or all of them
    Download {
        card_number: String,
        index: Option<String>,
        /// Output filename, only used for a single attachment
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnCmd {
    /// List columns for a board
    List {
        #[arg(long)]
        board: Option<String>,
    },
    /// Show a column
    Show {
        column_id: String,
        #[arg(long)]
        board: Option<String>,
    },
    /// Create a column
    Create {
        #[arg(long)]
        board: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Update a column
    Update {
        column_id: String,
        #[arg(long)]
        board: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a column
    Delete {
        column_id: String,
        #[arg(long)]
        board: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCmd {
    /// List comments on a card
    List {
        #[arg(long)]
        card: Option<String>,
        #[command(flatten)]
        pages: PageArgs,
    },
    /// Show a comment
    Show {
        comment_id: String,
        #[arg(long)]
        card: Option<String>,
    },
    /// Create a comment
    Create {
        #[arg(long)]
        card: Option<String>,
        /// Comment body (HTML)
        #[arg(long)]
        body: Option<String>,
        /// Read body from file
        #[arg(long = "body-file", alias = "body_file")]
        body_file: Option<PathBuf>,
        #[arg(long = "created-at")]
        created_at: Option<String>,
    },
    /// Update a comment
    Update {
        comment_id: String,
        #[arg(long)]
        card: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long = "body-file", alias = "body_file")]
        body_file: Option<PathBuf>,
    },
    /// Delete a comment
    Delete {
        comment_id: String,
        #[arg(long)]
        card: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StepCmd {
    /// Show a step
    Show {
        step_id: String,
        #[arg(long)]
        card: Option<String>,
    },
    /// Create a step
    Create {
        #[arg(long)]
        card: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        completed: bool,
    },
    /// Update a step
    Update {
        step_id: String,
        #[arg(long)]
        card: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, conflicts_with = "not_completed")]
        completed: bool,
        #[arg(long = "not-completed", alias = "not_completed")]
        not_completed: bool,
    },
    /// Delete a step
    Delete {
        step_id: String,
        #[arg(long)]
        card: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReactionCmd {
    /// List reactions on a comment
    List {
        #[arg(long)]
        card: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Add a reaction to a comment
    Create {
        #[arg(long)]
        card: Option<String>,
        #[arg(long)]
        comment: Option<String>,
        /// Emoji content
        #[arg(long)]
        content: Option<String>,
    },
    /// Remove a reaction
    Delete {
        reaction_id: String,
        #[arg(long)]
        card: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationCmd {
    /// List notifications
    List(PageArgs),
    /// Mark a notification as read
    Read { notification_id: String },
    /// Mark a notification as unread
    Unread { notification_id: String },
    /// Mark all notifications as read
    ReadAll,
}

#[derive(Subcommand, Debug)]
pub enum TagCmd {
    /// List tags
    List(PageArgs),
}

#[derive(Subcommand, Debug)]
pub enum UserCmd {
    /// List users
    List(PageArgs),
    /// Show a user
    Show { user_id: String },
}

#[derive(Subcommand, Debug)]
pub enum IdentityCmd {
    /// Show the identity the token belongs to
    Show,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Save an API token to the global config file
    Login { token: String },
    /// Remove saved credentials
    Logout,
    /// Show whether a token is configured
    Status,
}

#[derive(Subcommand, Debug)]
pub enum UploadCmd {
    /// Upload a file and print its signed_id
    File { path: PathBuf },
}
