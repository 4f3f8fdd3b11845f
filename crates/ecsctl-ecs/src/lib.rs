//! # ecsctl-ecs: Amazon ECS command catalog
//!
//! One module per resource family. Each command is a static
//! [`CommandDescriptor`](ecsctl_binding::CommandDescriptor), a request and
//! response shape, and an [`Operation`](ecsctl_binding::Operation) that
//! assembles the request from the bound context.
//!
//! | Module            | Commands                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | `cluster`         | new / remove / get-cluster-detail / get-cluster-list      |
//! | `service`         | new / update / remove / get-service / get-cluster-service |
//! | `task_definition` | register / unregister / detail / list                     |
//! | `task`            | new / stop / get-task-detail / get-task-list              |
//! | `tags`            | add / remove / get-resource-tag                           |

pub mod cluster;
pub mod params;
pub mod service;
pub mod shapes;
pub mod tags;
pub mod task;
pub mod task_definition;

#[cfg(test)]
mod testing;

use ecsctl_binding::{Binding, Cmdlet};

/// Every command, in help order.
pub static CATALOG: &[&dyn Cmdlet] = &[
    &Binding::<cluster::CreateCluster>::new(),
    &Binding::<cluster::DeleteCluster>::new(),
    &Binding::<cluster::DescribeClusters>::new(),
    &Binding::<cluster::ListClusters>::new(),
    &Binding::<service::CreateService>::new(),
    &Binding::<service::UpdateService>::new(),
    &Binding::<service::DeleteService>::new(),
    &Binding::<service::DescribeServices>::new(),
    &Binding::<service::ListServices>::new(),
    &Binding::<task_definition::RegisterTaskDefinition>::new(),
    &Binding::<task_definition::DeregisterTaskDefinition>::new(),
    &Binding::<task_definition::DescribeTaskDefinition>::new(),
    &Binding::<task_definition::ListTaskDefinitions>::new(),
    &Binding::<task::RunTask>::new(),
    &Binding::<task::StopTask>::new(),
    &Binding::<task::DescribeTasks>::new(),
    &Binding::<task::ListTasks>::new(),
    &Binding::<tags::TagResource>::new(),
    &Binding::<tags::UntagResource>::new(),
    &Binding::<tags::ListTagsForResource>::new(),
];

pub fn catalog() -> &'static [&'static dyn Cmdlet] {
    CATALOG
}

/// Look a command up by its command-line or legacy name.
pub fn find(name: &str) -> Option<&'static dyn Cmdlet> {
    CATALOG
        .iter()
        .copied()
        .find(|cmd| cmd.descriptor().is_named(name))
}
