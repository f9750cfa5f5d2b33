use crate::sheet::Side;
use crate::time::Month;
use crate::utils::build_info;

use super::context::{CommandError, CommandResult, ShellContext};
use super::registry::{CommandEntry, CommandRegistry};
use super::{help, output, table};

pub fn register_all(registry: &mut CommandRegistry) {
    let entries = [
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new(
            "range",
            "Set the month range and reconcile every line item",
            "range <start YYYY-MM> <end YYYY-MM>",
            cmd_range,
        ),
        CommandEntry::new(
            "add-parent",
            "Add a parent category",
            "add-parent <side> <label>",
            cmd_add_parent,
        ),
        CommandEntry::new(
            "remove-parent",
            "Remove a parent category and its line items",
            "remove-parent <side> <label>",
            cmd_remove_parent,
        ),
        CommandEntry::new(
            "rename-parent",
            "Rename a parent category",
            "rename-parent <side> <label> <new label>",
            cmd_rename_parent,
        ),
        CommandEntry::new(
            "add-child",
            "Add a line item under a parent",
            "add-child <side> <parent> <label>",
            cmd_add_child,
        ),
        CommandEntry::new(
            "remove-child",
            "Remove a line item",
            "remove-child <side> <parent> <index>",
            cmd_remove_child,
        ),
        CommandEntry::new(
            "rename-child",
            "Rename a line item",
            "rename-child <side> <parent> <index> <label>",
            cmd_rename_child,
        ),
        CommandEntry::new(
            "set",
            "Set a line item's value for one month",
            "set <side> <parent> <index> <month YYYY-MM> <value>",
            cmd_set,
        ),
        CommandEntry::new(
            "copy",
            "Copy a line item into the buffer",
            "copy <side> <parent> <index>",
            cmd_copy,
        ),
        CommandEntry::new(
            "paste",
            "Replace a line item with the buffered copy",
            "paste <side> <parent> <index>",
            cmd_paste,
        ),
        CommandEntry::new("show", "Render the sheet with all totals", "show", cmd_show),
        CommandEntry::new("json", "Print the derived report as JSON", "json", cmd_json),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
        CommandEntry::new("quit", "Leave the shell", "quit", cmd_exit),
    ];
    for entry in entries {
        registry.register(entry);
    }
}

fn expect_args(args: &[&str], count: usize, usage: &str) -> CommandResult {
    if args.len() == count {
        Ok(())
    } else {
        Err(CommandError::usage(usage))
    }
}

fn side_arg(raw: &str) -> Result<Side, CommandError> {
    Side::from_label(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!("Unknown side `{raw}`, use `income` or `expense`"))
    })
}

fn index_arg(raw: &str) -> Result<usize, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a line item index")))
}

fn month_arg(raw: &str) -> Result<Month, CommandError> {
    Ok(raw.parse::<Month>()?)
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => help::print_overview(&context.registry),
        Some(name) => match context.registry.get(&name.to_ascii_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
    }
    Ok(())
}

fn cmd_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "range <start YYYY-MM> <end YYYY-MM>")?;
    let stats = context.sheet.set_range_str(args[0], args[1]);
    let range = context.sheet.range();
    match (range.first(), range.last()) {
        (Some(first), Some(last)) => output::success(format!(
            "Range set to {first}..{last} ({} months): {} slots added, {} removed.",
            range.len(),
            stats.added,
            stats.removed
        )),
        _ => output::warning(format!(
            "Range `{}`..`{}` holds no months; {} slots removed.",
            args[0], args[1], stats.removed
        )),
    }
    Ok(())
}

fn cmd_add_parent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "add-parent <side> <label>")?;
    let side = side_arg(args[0])?;
    context.sheet.add_parent(side, args[1])?;
    output::success(format!("Added {side} category `{}`.", args[1]));
    Ok(())
}

fn cmd_remove_parent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "remove-parent <side> <label>")?;
    let side = side_arg(args[0])?;
    let removed = context.sheet.remove_parent(side, args[1])?;
    output::success(format!(
        "Removed {side} category `{}` with {} line items.",
        removed.label,
        removed.children.len()
    ));
    Ok(())
}

fn cmd_rename_parent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, "rename-parent <side> <label> <new label>")?;
    let side = side_arg(args[0])?;
    context.sheet.rename_parent(side, args[1], args[2])?;
    output::success(format!("Renamed `{}` to `{}`.", args[1], args[2]));
    Ok(())
}

fn cmd_add_child(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, "add-child <side> <parent> <label>")?;
    let side = side_arg(args[0])?;
    let index = context.sheet.add_child(side, args[1], args[2])?;
    output::success(format!(
        "Added line item [{index}] `{}` under `{}`.",
        args[2], args[1]
    ));
    Ok(())
}

fn cmd_remove_child(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, "remove-child <side> <parent> <index>")?;
    let side = side_arg(args[0])?;
    let index = index_arg(args[2])?;
    let removed = context.sheet.remove_child(side, args[1], index)?;
    output::success(format!(
        "Removed line item `{}` from `{}`.",
        removed.label, args[1]
    ));
    Ok(())
}

fn cmd_rename_child(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 4, "rename-child <side> <parent> <index> <label>")?;
    let side = side_arg(args[0])?;
    let index = index_arg(args[2])?;
    context.sheet.rename_child(side, args[1], index, args[3])?;
    output::success(format!("Renamed line item [{index}] to `{}`.", args[3]));
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 5, "set <side> <parent> <index> <month YYYY-MM> <value>")?;
    let side = side_arg(args[0])?;
    let index = index_arg(args[2])?;
    let month = month_arg(args[3])?;
    let value = context
        .sheet
        .set_value_text(side, args[1], index, month, args[4])?;
    output::success(format!(
        "{side}/{}[{index}] {month} = {}",
        args[1],
        table::format_amount(value)
    ));
    Ok(())
}

fn cmd_copy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, "copy <side> <parent> <index>")?;
    let side = side_arg(args[0])?;
    let index = index_arg(args[2])?;
    context.sheet.copy(side, args[1], index)?;
    output::success(format!("Copied {side}/{}[{index}].", args[1]));
    Ok(())
}

fn cmd_paste(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, "paste <side> <parent> <index>")?;
    let side = side_arg(args[0])?;
    let index = index_arg(args[2])?;
    if context.sheet.paste(side, args[1], index)? {
        output::success(format!("Pasted into {side}/{}[{index}].", args[1]));
    } else {
        output::info("Nothing copied yet.");
    }
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.sheet.flush();
    output::section("Budget sheet");
    for line in table::render_sheet(&context.sheet) {
        output::line(line);
    }
    Ok(())
}

fn cmd_json(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.sheet.flush();
    let json = serde_json::to_string_pretty(context.sheet.report())?;
    output::line(json);
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::line(build_info::current());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
