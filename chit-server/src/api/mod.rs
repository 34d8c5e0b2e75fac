//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`dashboard`] - 首页统计
//! - [`groups`] - 群组列表、成员、提醒设置与预览
//! - [`members`] - 成员详情、缴费记录、新增/编辑
//! - [`sessions`] - 管理员会话与页面导航
//! - [`reminders`] - 发送提醒工作流

pub mod dashboard;
pub mod groups;
pub mod health;
pub mod members;
pub mod reminders;
pub mod sessions;
