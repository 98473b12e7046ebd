use ninjabot::commands;

fn find<'a, U, E>(commands: &'a [poise::Command<U, E>], name: &str) -> &'a poise::Command<U, E> {
    commands
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("missing command {name}"))
}

fn names<U, E>(commands: &[poise::Command<U, E>]) -> Vec<&str> {
    let mut names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    names
}

#[test]
fn top_level_commands_and_aliases() {
    let all = commands::all();
    assert_eq!(names(&all), ["admin", "help", "ninja"]);

    let ninja = find(&all, "ninja");
    for alias in ["ninja_hunt", "ninja_bot", "ninjahunt", "ninjabot", "n"] {
        assert!(ninja.aliases.iter().any(|a| a == alias), "ninja alias {alias}");
    }
    assert_eq!(names(&ninja.subcommands), ["leaderboard", "score"]);
    assert_eq!(find(&ninja.subcommands, "score").aliases, ["s"]);
    assert_eq!(find(&ninja.subcommands, "leaderboard").aliases, ["lb"]);

    let admin = find(&all, "admin");
    assert_eq!(admin.aliases, ["a"]);
}

#[test]
fn admin_subcommands() {
    let all = commands::all();
    let admin = find(&all, "admin");
    assert_eq!(
        names(&admin.subcommands),
        ["block", "blocked", "game", "permissions", "unblock"]
    );

    let game = find(&admin.subcommands, "game");
    assert_eq!(names(&game.subcommands), ["clear", "start", "status", "stop"]);

    let permissions = find(&admin.subcommands, "permissions");
    assert_eq!(permissions.aliases, ["perms", "perm", "p"]);
    assert_eq!(names(&permissions.subcommands), ["add", "list", "remove"]);
}

#[test]
fn every_command_is_guarded() {
    fn walk<U, E>(commands: &[poise::Command<U, E>]) {
        for command in commands {
            assert!(!command.checks.is_empty(), "{} has no check", command.name);
            walk(&command.subcommands);
        }
    }
    walk(&commands::all());
}
