//! Interactive client shell.
//!
//! Each input line is parsed with clap, run against one [`AppState`], and
//! followed by a re-check of the current page so a page the session no longer
//! allows disappears before the next prompt.

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};

use shophere_core::{Money, OrderSummary, Password, ProductId, Role};
use shophere_storefront::config::StorefrontConfig;
use shophere_storefront::db::CredentialRepository;
use shophere_storefront::error::AppError;
use shophere_storefront::models::{CartLine, SessionPhase};
use shophere_storefront::routes::forms::{LoginForm, RegistrationForm};
use shophere_storefront::routes::{GateDecision, GateEffect, Page};
use shophere_storefront::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "shophere", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// A shell command.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Sign in
    Login {
        email: String,
        password: String,
        /// Role to sign in as (customer, vendor, admin)
        #[arg(default_value = "customer")]
        role: Role,
    },
    /// Create an account and sign in
    Register {
        email: String,
        password: String,
        /// Display name
        name: String,
        #[arg(long, default_value = "customer")]
        role: Role,
        /// Shop name, required for vendors
        #[arg(long)]
        business: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign out and empty the cart
    Logout,
    /// Switch the active role without signing in again (demo only)
    Role { role: Role },
    /// Show a page (home, product, cart, orders, vendor, admin)
    Go { page: String },
    /// Open a product page
    Product { id: String },
    /// Add a product to the cart
    Add {
        id: String,
        /// Unit price in dollars
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "ShopHere")]
        vendor: String,
    },
    /// Set a cart line's quantity; zero or less removes it
    Qty {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove { id: String },
    /// Show the cart and its totals
    Cart,
    /// Place an order for the cart
    Checkout,
    /// Show who is signed in
    Whoami,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns the clap error (including help output) for unknown commands or
/// bad arguments.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
    let words = split_words(line);
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

/// Split on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(current);
    }
    words
}

/// Run the interactive shell on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the demo accounts cannot be seeded or the terminal
/// cannot be read or written.
pub async fn run(config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_config(config)?;
    let mut shell = Shell::new(state, io::stdout());
    shell.greet()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        shell.prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if shell.execute(command).await? == Flow::Quit {
                    break;
                }
            }
            Err(e) => write!(shell.out, "{}", e.render())?,
        }
    }
    Ok(())
}

/// Shell state: the client and where its output goes.
pub struct Shell<R, W> {
    state: AppState<R>,
    out: W,
}

impl<R: CredentialRepository, W: Write> Shell<R, W> {
    /// Create a shell over `state`.
    pub const fn new(state: AppState<R>, out: W) -> Self {
        Self { state, out }
    }

    /// Print the opening banner.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn greet(&mut self) -> io::Result<()> {
        writeln!(self.out, "ShopHere marketplace. Type `help` for commands.")?;
        if let Some(identity) = self.state.session().identity() {
            writeln!(self.out, "Welcome back, {}.", identity.name)?;
        }
        Ok(())
    }

    /// Print the prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn prompt(&mut self) -> io::Result<()> {
        let session = self.state.session();
        let who = if session.is_authenticated() {
            session.role().as_str()
        } else {
            "guest"
        };
        write!(self.out, "[{}] {who}> ", self.state.navigation().page())?;
        self.out.flush()
    }

    /// Run one command, then re-check the current page.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub async fn execute(&mut self, command: ShellCommand) -> io::Result<Flow> {
        match command {
            ShellCommand::Login {
                email,
                password,
                role,
            } => {
                let form = LoginForm {
                    email,
                    password: Password::from(password),
                    role,
                };
                match self.state.login(&form).await {
                    Ok(identity) => {
                        writeln!(self.out, "Signed in as {} ({role}).", identity.name)?;
                    }
                    Err(e) => self.refused(&e)?,
                }
            }
            ShellCommand::Register {
                email,
                password,
                name,
                role,
                business,
                phone,
            } => {
                let password = Password::from(password);
                let form = RegistrationForm {
                    name,
                    email,
                    confirm_password: password.clone(),
                    password,
                    role,
                    business_name: business.unwrap_or_default(),
                    phone: phone.unwrap_or_default(),
                };
                match self.state.register(&form).await {
                    Ok(identity) => writeln!(
                        self.out,
                        "Welcome, {}! Registered as {role} (id {}).",
                        identity.name, identity.id
                    )?,
                    Err(e) => self.refused(&e)?,
                }
            }
            ShellCommand::Logout => {
                self.state.logout();
                writeln!(self.out, "Signed out.")?;
            }
            ShellCommand::Role { role } => {
                if self.state.demo_switch_role(role) {
                    writeln!(self.out, "Active role is now {role} (demo override).")?;
                } else {
                    writeln!(self.out, "Sign in before switching roles.")?;
                }
            }
            ShellCommand::Go { page } => {
                let decision = self.state.request_page(Page::from(page.as_str()));
                self.report(decision)?;
                if decision.is_allowed() {
                    self.show_page()?;
                }
            }
            ShellCommand::Product { id } => {
                self.state.select_product(ProductId::new(id));
                self.show_page()?;
            }
            ShellCommand::Add {
                id,
                price,
                quantity,
                name,
                vendor,
            } => {
                let line = CartLine {
                    name: name.unwrap_or_else(|| id.clone()),
                    product_id: ProductId::new(id),
                    unit_price: Money::new(price),
                    image: String::new(),
                    vendor,
                    quantity,
                };
                match self.state.add_to_cart(line) {
                    Ok(()) => writeln!(
                        self.out,
                        "Cart has {} item(s).",
                        self.state.cart().total_item_count()
                    )?,
                    Err(e) => writeln!(self.out, "{e}")?,
                }
            }
            ShellCommand::Qty { id, quantity } => {
                self.state.update_quantity(&ProductId::new(id), quantity);
                self.show_cart()?;
            }
            ShellCommand::Remove { id } => {
                self.state.remove_from_cart(&ProductId::new(id));
                self.show_cart()?;
            }
            ShellCommand::Cart => {
                let decision = self.state.request_page(Page::Cart);
                self.report(decision)?;
                if decision.is_allowed() {
                    self.show_cart()?;
                }
            }
            ShellCommand::Checkout => {
                writeln!(self.out, "Processing...")?;
                match self.state.checkout().await {
                    Ok(order) => {
                        writeln!(
                            self.out,
                            "Order placed successfully! {} item(s), total {}.",
                            order.item_count(),
                            order.summary.total
                        )?;
                    }
                    Err(e) => self.refused(&AppError::from(e))?,
                }
            }
            ShellCommand::Whoami => self.whoami()?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        let decision = self.state.render();
        self.report(decision)?;
        Ok(Flow::Continue)
    }

    fn refused(&mut self, error: &AppError) -> io::Result<()> {
        writeln!(self.out, "{}", error.report())
    }

    fn report(&mut self, decision: GateDecision) -> io::Result<()> {
        match decision.effect {
            None => Ok(()),
            Some(GateEffect::PromptLogin) => writeln!(
                self.out,
                "Please log in to continue: login <email> <password> <role>"
            ),
            Some(GateEffect::Denied(reason)) => writeln!(self.out, "{reason}"),
        }
    }

    fn show_page(&mut self) -> io::Result<()> {
        let navigation = self.state.navigation();
        match navigation.page() {
            Page::Product => match navigation.selected_product() {
                Some(product) => writeln!(self.out, "== Product {product} =="),
                None => writeln!(self.out, "== Product =="),
            },
            Page::Cart => self.show_cart(),
            page => writeln!(self.out, "== {} ==", page.as_str().to_uppercase()),
        }
    }

    fn show_cart(&mut self) -> io::Result<()> {
        let cart = self.state.cart();
        if cart.is_empty() {
            return writeln!(self.out, "Your cart is empty.");
        }

        for line in cart.lines() {
            writeln!(
                self.out,
                "{:<10} {:<24} {:>4} x {:>10} = {:>10}",
                line.product_id.as_str(),
                line.name,
                line.quantity,
                line.unit_price.display(),
                line.line_total().display()
            )?;
        }

        let summary = OrderSummary::from_subtotal(cart.subtotal());
        writeln!(self.out, "Subtotal: {}", summary.subtotal)?;
        writeln!(self.out, "Tax (8%): {}", summary.tax)?;
        writeln!(self.out, "Shipping: Free")?;
        writeln!(self.out, "Total:    {}", summary.total)
    }

    fn whoami(&mut self) -> io::Result<()> {
        let session = self.state.session();
        match (session.phase(), session.identity()) {
            (SessionPhase::Authenticated(role), Some(identity)) => {
                write!(self.out, "{} <{}> as {role}", identity.name, identity.email)?;
                if let Some(business) = &identity.business_name {
                    write!(self.out, ", {business}")?;
                }
                writeln!(self.out)
            }
            (SessionPhase::Authenticating, _) => writeln!(self.out, "Signing in..."),
            _ => writeln!(self.out, "Not signed in."),
        }
    }
}
