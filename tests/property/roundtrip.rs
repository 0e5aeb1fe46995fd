use std::collections::BTreeMap;

use proptest::prelude::*;

use launchset::config::{DescriptorSet, ProcessSpec, RawDescriptorSet};
use launchset::format::Format;
use launchset::role::{NODE_ENV, Role};
use launchset::types::{ExecMode, MemorySize, SizeUnit};

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Api),
        Just(Role::Cron),
        Just(Role::Workflow),
        Just(Role::Queue),
    ]
}

fn memory_strategy() -> impl Strategy<Value = Option<MemorySize>> {
    let unit = prop_oneof![
        Just(SizeUnit::Bytes),
        Just(SizeUnit::Kilo),
        Just(SizeUnit::Mega),
        Just(SizeUnit::Giga),
    ];
    proptest::option::of(
        (1u64..4096, unit).prop_map(|(amount, unit)| MemorySize::new(amount, unit).unwrap()),
    )
}

fn spec_strategy(script: String) -> impl Strategy<Value = ProcessSpec> {
    (
        1u32..16,
        prop_oneof![Just(ExecMode::Fork), Just(ExecMode::Cluster)],
        memory_strategy(),
        any::<bool>(),
        role_strategy(),
        proptest::collection::btree_map("[A-Z][A-Z0-9_]{0,8}", "[a-zA-Z0-9 ./:'\"\\\\-]{0,12}", 0..4),
    )
        .prop_map(move |(instances, exec_mode, ceiling, watch, role, extra)| {
            let mut env: BTreeMap<String, String> = extra;
            env.insert(NODE_ENV.to_string(), "production".to_string());
            // Role flags last, so random keys never break role exclusivity.
            env.extend(role.flag_env());

            ProcessSpec {
                instances,
                exec_mode,
                max_memory_restart: ceiling,
                watch,
                env,
                ..ProcessSpec::new("placeholder", script.clone())
            }
        })
}

// Valid sets: unique names, one shared absolute script.
fn set_strategy() -> impl Strategy<Value = RawDescriptorSet> {
    prop_oneof![Just("/app/dist/main.js"), Just("/srv/backend/index.js")].prop_flat_map(|script| {
        proptest::collection::vec(spec_strategy(script.to_string()), 1..5).prop_map(|specs| {
            let apps = specs
                .into_iter()
                .enumerate()
                .map(|(i, mut spec)| {
                    spec.name = format!("app_{i}");
                    spec
                })
                .collect();
            RawDescriptorSet { apps }
        })
    })
}

proptest! {
    #[test]
    fn rendered_sets_parse_back_identically(raw in set_strategy()) {
        let set = DescriptorSet::try_from(raw.clone()).unwrap();

        for format in [Format::Js, Format::Json, Format::Toml] {
            let text = format.render(&raw).unwrap();
            let back = format.parse(&text).unwrap();
            prop_assert_eq!(&back, &raw, "format {}", format);

            let revalidated = DescriptorSet::try_from(back).unwrap();
            prop_assert_eq!(&revalidated, &set);
        }
    }
}
