//! Resource tagging: TagResource, UntagResource, ListTagsForResource.

use crate::params;
use crate::shapes::{tags_from_map, Tag};
use ecsctl_binding::{
    projection, BindError, CommandDescriptor, ConfirmSpec, Context, Operation, ParamSpec,
    ParamType, Projection,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const RESOURCE_ARN: ParamSpec = ParamSpec::new("ResourceArn", ParamType::String)
    .required()
    .pipeline()
    .help("ARN of the cluster, service, task, task definition or container instance");

/// Reply with no members.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}

/// Nothing to select from an [`EmptyResponse`]; only `*` and `^Param` apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMembers {}

impl Projection for NoMembers {
    type Response = EmptyResponse;

    const FIELDS: &'static [(&'static str, Self)] = &[];

    fn project(self, _response: &EmptyResponse) -> Value {
        match self {}
    }
}

// ── add-resource-tag ────────────────────────────────────────────────────

pub static ADD_RESOURCE_TAG: CommandDescriptor = CommandDescriptor {
    name: "add-resource-tag",
    legacy_name: "Add-ECSResourceTag",
    operation: "TagResource",
    about: "Adds tags to a resource",
    params: &[RESOURCE_ARN, params::TAG.required()],
    default_select: "*",
    confirm: Some(ConfirmSpec {
        targets: &["ResourceArn"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct TagResourceRequest {
    #[serde(rename = "resourceArn", skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

pub struct TagResource;

impl Operation for TagResource {
    type Request = TagResourceRequest;
    type Response = EmptyResponse;
    type Field = NoMembers;

    fn descriptor() -> &'static CommandDescriptor {
        &ADD_RESOURCE_TAG
    }

    fn assemble(ctx: &Context) -> Result<TagResourceRequest, BindError> {
        Ok(TagResourceRequest {
            resource_arn: ctx.string("ResourceArn"),
            tags: ctx.map("Tag").map(tags_from_map),
        })
    }
}

// ── remove-resource-tag ─────────────────────────────────────────────────

pub static REMOVE_RESOURCE_TAG: CommandDescriptor = CommandDescriptor {
    name: "remove-resource-tag",
    legacy_name: "Remove-ECSResourceTag",
    operation: "UntagResource",
    about: "Removes tags from a resource",
    params: &[
        RESOURCE_ARN,
        ParamSpec::new("TagKey", ParamType::StringList)
            .required()
            .aliases(&["TagKeys"]),
    ],
    default_select: "*",
    confirm: Some(ConfirmSpec {
        targets: &["ResourceArn"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct UntagResourceRequest {
    #[serde(rename = "resourceArn", skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,
    #[serde(rename = "tagKeys", skip_serializing_if = "Option::is_none")]
    pub tag_keys: Option<Vec<String>>,
}

pub struct UntagResource;

impl Operation for UntagResource {
    type Request = UntagResourceRequest;
    type Response = EmptyResponse;
    type Field = NoMembers;

    fn descriptor() -> &'static CommandDescriptor {
        &REMOVE_RESOURCE_TAG
    }

    fn assemble(ctx: &Context) -> Result<UntagResourceRequest, BindError> {
        Ok(UntagResourceRequest {
            resource_arn: ctx.string("ResourceArn"),
            tag_keys: ctx.strings("TagKey"),
        })
    }
}

// ── get-resource-tag ────────────────────────────────────────────────────

pub static GET_RESOURCE_TAG: CommandDescriptor = CommandDescriptor {
    name: "get-resource-tag",
    legacy_name: "Get-ECSTagsForResource",
    operation: "ListTagsForResource",
    about: "Lists the tags of a resource",
    params: &[ParamSpec::new("ResourceArn", ParamType::String)
        .required()
        .pipeline()],
    default_select: "Tags",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct ListTagsForResourceRequest {
    #[serde(rename = "resourceArn", skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListTagsForResourceResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

projection! {
    pub enum ListTagsForResourceField for ListTagsForResourceResponse {
        Tags => tags,
    }
}

pub struct ListTagsForResource;

impl Operation for ListTagsForResource {
    type Request = ListTagsForResourceRequest;
    type Response = ListTagsForResourceResponse;
    type Field = ListTagsForResourceField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_RESOURCE_TAG
    }

    fn assemble(ctx: &Context) -> Result<ListTagsForResourceRequest, BindError> {
        Ok(ListTagsForResourceRequest {
            resource_arn: ctx.string("ResourceArn"),
        })
    }
}
