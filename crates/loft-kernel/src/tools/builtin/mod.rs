//! Built-in tools for loft.
//!
//! The fixed command surface of the shell. Each module holds one tool in
//! the same shape: a unit struct, a schema, an execute body, and its tests.

mod ai;
mod cat;
mod cd;
mod clear;
mod cp;
mod date;
mod df;
mod du;
mod echo;
mod env;
mod find;
mod git;
mod grep;
mod head;
mod help;
mod history;
mod ls;
mod mkdir;
mod mv;
mod ps;
mod pwd;
mod rm;
mod rmdir;
mod tail;
mod touch;
mod wc;
mod whoami;

use super::ToolRegistry;

/// Register all built-in tools with the registry.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(ai::Ai);
    registry.register(cat::Cat);
    registry.register(cd::Cd);
    registry.register(clear::Clear);
    registry.register(cp::Cp);
    registry.register(date::Date);
    registry.register(df::Df);
    registry.register(du::Du);
    registry.register(echo::Echo);
    registry.register(env::Env);
    registry.register(find::Find);
    registry.register(git::Git);
    registry.register(grep::Grep);
    registry.register(head::Head);
    registry.register(help::Help);
    registry.register(history::History);
    registry.register(ls::Ls);
    registry.register(mkdir::Mkdir);
    registry.register(mv::Mv);
    registry.register(ps::Ps);
    registry.register(pwd::Pwd);
    registry.register(rm::Rm);
    registry.register(rmdir::Rmdir);
    registry.register(tail::Tail);
    registry.register(touch::Touch);
    registry.register(wc::Wc);
    registry.register(whoami::Whoami);
}
