use ::behavior_tree_rl::{
    tags, ActionRegistry, Blackboard, PoolConfig, Selector, Sequence, Status, Task, TaskState,
    Tree, DEBUG_STRING_KEY,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy)]
#[repr(i32)]
enum Situation {
    Combat,
    Idle,
}

struct Attack {
    state: TaskState,
}

impl Default for Attack {
    fn default() -> Self {
        Self {
            state: TaskState::new("Attack")
                .poolable()
                .with_compatibility(tags![Situation::Combat as i32]),
        }
    }
}

impl Task for Attack {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        let status = match blackboard.get_int("enemy_hp") {
            Some(hp) if hp > 0 => {
                println!("Attack: enemy has {hp} hp left");
                blackboard.set_value("enemy_hp", hp - 25);
                Status::Running
            }
            Some(_) => Status::Success,
            None => Status::Failed,
        };
        self.state.update(status)
    }
}

struct Rest {
    state: TaskState,
}

impl Default for Rest {
    fn default() -> Self {
        Self {
            state: TaskState::new("Rest")
                .poolable()
                .with_compatibility(tags![Situation::Idle as i32]),
        }
    }
}

impl Task for Rest {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        let hp = blackboard.get_int("hp").unwrap_or(0);
        println!("Rest: recovering at {hp} hp");
        blackboard.set_value("hp", hp + 10);
        self.state.update(Status::Running)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = PoolConfig::from_yaml("seed: 7")?;
    let mut rng = config.rng();
    let registry = ActionRegistry::builder()
        .config(config)
        .register::<Attack>()
        .register::<Rest>()
        .build();

    let mut tree = Tree::new_node(Selector::default());
    tree.graft(&[], Box::new(Sequence::default()))?;
    tree.graft(
        &[0],
        registry.get_random_compatible_action_with(&tags![Situation::Combat as i32], &mut rng)?,
    )?;
    tree.graft(&[], registry.get_action("Rest")?)?;
    println!("Tree:{}", tree.build_debug_string());

    tree.blackboard_mut().set_value("hp", 30);
    for frame in 0..6 {
        if frame == 2 {
            tree.blackboard_mut().set_value("enemy_hp", 50);
        }
        let status = tree.tick();
        println!(
            "frame {frame}: {status:?} (debug entry {:?})",
            tree.blackboard().get_str(*DEBUG_STRING_KEY)
        );
    }

    Ok(())
}
