//! Built-in jobs for the sites this tool was first written against.

use crate::job::Job;
use crate::request::RequestDescriptor;
use crate::response::DecodeMode;
use crate::structured::{Column, Listing};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

const MAC_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.71 Safari/537.36";

const ICVE_COURSES: &str = "https://zyk.icve.com.cn/prod-api/website/course/list";
const KFC_STORES: &str = "http://www.kfc.com.cn/kfccda/ashx/GetStoreList.ashx?op=keyword";

pub fn presets() -> Vec<Job> {
    vec![
        eastmoney(),
        game51(),
        cpta(),
        cpta_search(),
        icve_courses(),
        icve_pages(),
        kfc_guangzhou(),
        kfc_tianjin(),
        xiachufang(),
    ]
}

fn eastmoney() -> Job {
    Job::new("eastmoney", RequestDescriptor::get("https://www.eastmoney.com/"))
        .encoding("utf-8")
        .preview(100)
        .destination("caifu.html")
}

fn game51() -> Job {
    Job::new(
        "game51",
        RequestDescriptor::get("https://game.51.com/search/action/game/"),
    )
    .prompt("Enter the game title to search: ", Some("q"))
    .encoding("utf-8")
    .preview(500)
    .destination("51search.html")
}

fn cpta() -> Job {
    Job::new(
        "cpta",
        RequestDescriptor::get("http://www.cpta.com.cn/").header("User-Agent", BROWSER_USER_AGENT),
    )
    .preview(500)
    .destination("cpta_with_ua.html")
}

fn cpta_search() -> Job {
    Job::new(
        "cpta-search",
        RequestDescriptor::post("http://www.cpta.com.cn/category/search")
            .header("User-Agent", BROWSER_USER_AGENT)
            .form("keywords", "人力资源")
            .form("搜 索", "搜 索"),
    )
    .destination("cpta_search.html")
}

fn icve_request() -> RequestDescriptor {
    RequestDescriptor::get(ICVE_COURSES)
        .header("User-Agent", BROWSER_USER_AGENT)
        .query("sort", "create_time")
        .query("pageNum", "1")
        .query("pageSize", "15")
        .query("keyword", "数据")
}

fn icve_listing() -> Listing {
    Listing::new(
        "rows",
        vec![
            Column::new("Course Name", "name"),
            Column::new("Teacher Name", "userName"),
        ],
    )
}

fn icve_courses() -> Job {
    Job::new("icve-courses", icve_request())
        .dump()
        .listing(icve_listing())
        .destination("zyk_courses.json")
}

fn icve_pages() -> Job {
    Job::new("icve-pages", icve_request())
        .listing(icve_listing())
        .pages("pageNum", 1, 3)
}

fn kfc_stores(city: &str, user_agent: &str) -> RequestDescriptor {
    RequestDescriptor::post(KFC_STORES)
        .header("User-Agent", user_agent)
        .form("cname", "")
        .form("pid", "")
        .form("keyword", city)
        .form("pageIndex", "1")
        .form("pageSize", "10")
}

fn kfc_guangzhou() -> Job {
    Job::new("kfc-guangzhou", kfc_stores("广州", BROWSER_USER_AGENT)).listing(Listing::new(
        "Table1",
        vec![
            Column::new("KFC Store Name", "storeName"),
            Column::new("Address", "addressDetail"),
        ],
    ))
}

fn kfc_tianjin() -> Job {
    Job::new("kfc-tianjin", kfc_stores("天津", MAC_USER_AGENT)).listing(
        Listing::new(
            "Table1",
            vec![Column::bare("storeName"), Column::bare("addressDetail")],
        )
        .separator(" "),
    )
}

fn xiachufang() -> Job {
    Job::new(
        "xiachufang",
        RequestDescriptor::get("https://www.xiachufang.com/search/")
            .header("User-Agent", BROWSER_USER_AGENT)
            .query("cat", "1001"),
    )
    .mode(DecodeMode::Text)
    .prompt(
        "please input the recipe title you want to search: ",
        Some("keyword"),
    )
    .encoding("utf-8")
    .destination("{input}.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn presets_are_valid_and_unique() {
        let jobs = presets();
        let names: HashSet<_> = jobs.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names.len(), jobs.len());
        for job in &jobs {
            job.validate().unwrap();
        }
    }

    #[test]
    fn pages_walk_one_to_three() {
        let job = icve_pages();
        let pages = job.pages.as_ref().unwrap();
        assert_eq!((pages.first, pages.last), (1, 3));
        assert_eq!(job.request.query.get("pageSize").map(String::as_str), Some("15"));
        assert!(job.destination.is_none());
    }

    #[test]
    fn kfc_presets_differ_in_agent_and_format() {
        let guangzhou = kfc_guangzhou();
        let tianjin = kfc_tianjin();
        assert_ne!(
            guangzhou.request.headers.get("User-Agent"),
            tianjin.request.headers.get("User-Agent")
        );

        let value = serde_json::json!({
            "Table1": [{"storeName": "Binhai", "addressDetail": "8 Harbour Road"}]
        });
        let lines = |job: &Job| job.listing.as_ref().unwrap().lines(&value).unwrap();
        assert_eq!(lines(&guangzhou), vec!["KFC Store Name: Binhai, Address: 8 Harbour Road"]);
        assert_eq!(lines(&tianjin), vec!["Binhai 8 Harbour Road"]);
    }
}
