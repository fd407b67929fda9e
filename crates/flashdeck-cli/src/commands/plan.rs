use super::{print_json, CmdResult, Context};

pub fn run() -> CmdResult {
    let ctx = Context::load()?;
    print_json(&ctx.actions().plan_status()?)?;
    Ok(())
}
