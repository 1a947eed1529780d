//! Fixtures shared by the unit test modules.
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use serde_json::json;

use crate::input::tree::ResourceTree;
use crate::localizer::Localizer;

/// Part of the English admin UI resource, nested.
pub(crate) fn en_tree() -> ResourceTree {
    ResourceTree::from_value(json!({
        "remove": "Remove",
        "confirm": "Confirm",
        "nav": {
            "basic": "Basic",
            "server": "Server",
            "location": "Location"
        },
        "basic": {
            "title": "Modify the basic configuration of pingap",
            "name": "Name",
            "namePlaceholder": "Input the name of pingap process",
            "threads": "Threads"
        }
    }))
    .unwrap()
}

/// Part of the Chinese admin UI resource, flat.
pub(crate) fn zh_tree() -> ResourceTree {
    ResourceTree::from_flat([
        ("nav.basic", "基础配置"),
        ("nav.server", "服务配置"),
        ("basic.title", "修改应用的基本信息配置"),
        ("basic.name", "名称"),
        ("basic.threads", "各服务默认的线程数"),
        ("form.remove", "删除"),
        ("form.submit", "提交"),
    ])
}

/// A default-configured localizer with `en` and `zh` registered.
pub(crate) fn pingap_localizer() -> Localizer {
    let localizer = Localizer::default();
    localizer.register("en", &en_tree()).unwrap();
    localizer.register("zh", &zh_tree()).unwrap();
    localizer
}
